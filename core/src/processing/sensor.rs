use crate::interface::{DetectionBuffer, TickInput, TickOutput};
use crate::prelude::{ProcessingStage, RadarConfig, RadarError, RadarResult};
use crate::processing::features::FeatureExtractor;
use crate::processing::ray::RayDescriptor;
use crate::processing::sampler::RaySampler;
use crate::processing::tracer::MultiBounceTracer;
use crate::s11n::DetectionSerializer;
use crate::scene::{ObjectId, SceneAccess};
use crate::telemetry::{LogManager, MetricsRecorder};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// Ray-traced radar sensor: samples, traces and collects one batch of rays per tick.
pub struct RadarSensor<S> {
    scene: Arc<S>,
    sensor_id: ObjectId,
    config: RadarConfig,
    buffer: DetectionBuffer,
    rays: Vec<RayDescriptor>,
    rng: StdRng,
    pool: ThreadPool,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

fn build_pool(worker_threads: usize) -> RadarResult<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .thread_name(|index| format!("radar-trace-{}", index))
        .build()
        .map_err(|err| RadarError::WorkerPool(err.to_string()))
}

impl<S: SceneAccess> RadarSensor<S> {
    pub fn new(config: RadarConfig, sensor_id: ObjectId, scene: Arc<S>) -> RadarResult<Self> {
        config.validate()?;
        let pool = build_pool(config.worker_threads)?;
        let buffer = DetectionBuffer::with_capacity(config.points_per_second as usize);
        Ok(Self {
            scene,
            sensor_id,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            buffer,
            rays: Vec::new(),
            pool,
            logger: LogManager::new("radar"),
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    /// Replaces the random source used to sample rays.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn sensor_id(&self) -> ObjectId {
        self.sensor_id
    }

    /// Detections written by the last tick.
    pub fn buffer(&self) -> &DetectionBuffer {
        &self.buffer
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        Arc::clone(&self.metrics)
    }

    pub fn set_horizontal_fov(&mut self, degrees: f32) -> RadarResult<()> {
        self.update(|config| config.horizontal_fov_deg = degrees)
    }

    pub fn set_vertical_fov(&mut self, degrees: f32) -> RadarResult<()> {
        self.update(|config| config.vertical_fov_deg = degrees)
    }

    pub fn set_range(&mut self, range_m: f32) -> RadarResult<()> {
        self.update(|config| config.range_m = range_m)
    }

    /// Changes the ray rate and re-reserves the detection buffer.
    ///
    /// This reallocates; only call it between ticks.
    pub fn set_points_per_second(&mut self, points_per_second: u32) {
        self.config.points_per_second = points_per_second;
        self.buffer.set_capacity(points_per_second as usize);
    }

    fn update(&mut self, edit: impl FnOnce(&mut RadarConfig)) -> RadarResult<()> {
        let mut candidate = self.config.clone();
        edit(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    /// Runs one tick and replaces the buffer contents with its detections.
    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        self.buffer.clear();

        let count = self.config.rays_for(input.elapsed_time);
        RaySampler::sample_into(&mut self.rng, count, &mut self.rays);

        let features =
            FeatureExtractor::new(input.pose, input.elapsed_time, self.config.meters_per_unit);
        let tracer = MultiBounceTracer::new(&self.config, self.sensor_id, features);

        let rays = &mut self.rays;
        let pool = &self.pool;
        self.scene.with_read_access(|gateway| {
            pool.install(|| {
                rays.par_iter_mut()
                    .for_each(|ray| tracer.trace(gateway, ray));
            });
        });

        let output = self.collect(count);
        if output.overflowed {
            self.logger.warn(&format!(
                "detection buffer grew past its reserved capacity ({} > {}); raise points_per_second",
                output.detections,
                self.buffer.capacity()
            ));
        }
        if output.faulted_rays > 0 {
            self.logger.trace(&format!(
                "{} of {} rays dropped on degenerate geometry",
                output.faulted_rays, count
            ));
        }
        self.metrics.record_tick(&output);
        output
    }

    fn collect(&mut self, count: usize) -> TickOutput {
        let mut output = TickOutput {
            rays: count,
            ..Default::default()
        };
        for ray in &self.rays {
            if ray.fault.is_some() {
                output.faulted_rays += 1;
                continue;
            }
            if ray.returned_to_sensor {
                output.returned_rays += 1;
            }
            for detection in ray.detections() {
                self.buffer.append(detection);
            }
        }
        output.detections = self.buffer.count();
        output.overflowed = self.buffer.overflowed();
        output
    }

    /// Serialized form of the last tick's detections.
    pub fn pack(&self) -> Vec<u8> {
        DetectionSerializer::pack(&self.buffer)
    }
}

impl<S: SceneAccess> ProcessingStage for RadarSensor<S> {
    type Input = TickInput;
    type Output = TickOutput;

    fn initialize(&mut self, config: &RadarConfig) -> RadarResult<()> {
        config.validate()?;
        if config.worker_threads != self.config.worker_threads {
            self.pool = build_pool(config.worker_threads)?;
        }
        if config.points_per_second != self.config.points_per_second
            || self.buffer.capacity() != config.points_per_second as usize
        {
            self.buffer.set_capacity(config.points_per_second as usize);
        }
        self.config = config.clone();
        self.logger.record(&format!(
            "configured: fov {}x{} deg, range {} m, {} pts/s, {} bounces",
            config.horizontal_fov_deg,
            config.vertical_fov_deg,
            config.range_m,
            config.points_per_second,
            config.max_bounces
        ));
        Ok(())
    }

    fn execute(&mut self, input: TickInput) -> RadarResult<TickOutput> {
        if !input.elapsed_time.is_finite() || input.elapsed_time < 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "elapsed time must be finite and non-negative, got {}",
                input.elapsed_time
            )));
        }
        Ok(self.tick(&input))
    }

    fn cleanup(&mut self) {
        self.buffer.clear();
        self.rays.clear();
    }
}
