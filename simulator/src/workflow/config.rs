use crate::generator::scene::SceneConfig;
use anyhow::Context;
use nalgebra::{UnitQuaternion, Vector3};
use rtradar::RadarConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Straight-line sensor motion at a fixed heading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    pub start: [f32; 3],
    pub velocity: [f32; 3],
    pub yaw_deg: f32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0, 0.0],
            velocity: [5.0, 0.0, 0.0],
            yaw_deg: 0.0,
        }
    }
}

impl TrajectoryConfig {
    pub fn velocity(&self) -> Vector3<f32> {
        Vector3::from(self.velocity)
    }

    pub fn position_at(&self, seconds: f32) -> Vector3<f32> {
        Vector3::from(self.start) + self.velocity() * seconds
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw_deg.to_radians())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub radar: RadarConfig,
    pub ticks: usize,
    pub tick_seconds: f32,
    pub sensor: TrajectoryConfig,
    pub scene: SceneConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            radar: RadarConfig::default(),
            ticks: 20,
            tick_seconds: 0.05,
            sensor: TrajectoryConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .radar
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(ticks: usize, points_per_second: u32, range_m: f32, seed: u64) -> Self {
        Self {
            radar: RadarConfig {
                points_per_second,
                range_m,
                seed,
                ..Default::default()
            },
            ticks,
            ..Default::default()
        }
    }
}
