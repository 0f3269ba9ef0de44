use crate::generator::scene::build_scene;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use rtradar::interface::{SensorPose, TickInput, TickOutput};
use rtradar::math::StatsHelper;
use rtradar::prelude::ProcessingStage;
use rtradar::processing::RadarSensor;
use rtradar::s11n::DetectionSerializer;
use rtradar::scene::ObjectId;
use rtradar::telemetry::MetricsSnapshot;
use std::sync::Arc;

const SENSOR_ID: ObjectId = ObjectId(0);

pub struct WorkflowResult {
    pub ticks: Vec<TickOutput>,
    /// Packed detections of the final tick.
    pub last_frame: Vec<u8>,
    pub depth_mean: f32,
    pub depth_max: f32,
    pub velocity_rms: f32,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    #[allow(dead_code)]
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        self.execute_with(|_, _, _| Ok(()))
    }

    /// Runs every tick, handing each packed frame to `on_frame` before the world advances.
    pub fn execute_with<F>(&self, mut on_frame: F) -> anyhow::Result<WorkflowResult>
    where
        F: FnMut(usize, &TickOutput, &[u8]) -> anyhow::Result<()>,
    {
        let trajectory = &self.config.sensor;
        let dt = self.config.tick_seconds;
        let scene = Arc::new(build_scene(
            &self.config.scene,
            SENSOR_ID,
            trajectory.position_at(0.0),
            trajectory.velocity(),
        ));

        let mut sensor = RadarSensor::new(self.config.radar.clone(), SENSOR_ID, Arc::clone(&scene))
            .context("creating radar sensor")?;
        sensor
            .initialize(&self.config.radar)
            .context("initializing radar sensor")?;

        let mut pose = SensorPose::stationary(trajectory.position_at(0.0), trajectory.orientation());
        let mut frame = Vec::new();
        let mut ticks = Vec::with_capacity(self.config.ticks);

        for tick in 0..self.config.ticks {
            let output = sensor
                .execute(TickInput {
                    elapsed_time: dt,
                    pose,
                })
                .with_context(|| format!("executing tick {}", tick))?;
            DetectionSerializer::pack_into(sensor.buffer(), &mut frame);
            on_frame(tick, &output, &frame).with_context(|| format!("publishing tick {}", tick))?;
            ticks.push(output);

            scene.advance(dt);
            let next = trajectory.position_at((tick + 1) as f32 * dt);
            pose = pose.advanced(next, trajectory.orientation());
        }
        sensor.cleanup();

        let measurement = DetectionSerializer::unpack(&frame).context("decoding last frame")?;
        let depths: Vec<f32> = measurement.iter().map(|d| d.depth).collect();
        let velocities: Vec<f32> = measurement.iter().map(|d| d.velocity).collect();
        let metrics = sensor.metrics().snapshot();
        info!(
            "workflow finished: {} ticks, {} detections, {} faulted rays",
            metrics.ticks, metrics.detections, metrics.faulted_rays
        );

        Ok(WorkflowResult {
            ticks,
            depth_mean: StatsHelper::mean(&depths),
            depth_max: StatsHelper::max(&depths),
            velocity_rms: StatsHelper::rms(&velocities),
            last_frame: frame,
            metrics,
        })
    }
}
