use serde::{Deserialize, Serialize};

/// Sensor configuration shared by the sampling, tracing and buffering stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub horizontal_fov_deg: f32,
    pub vertical_fov_deg: f32,
    pub range_m: f32,
    pub points_per_second: u32,
    pub max_bounces: u32,
    /// Length of one scene unit in meters.
    pub meters_per_unit: f32,
    /// Size of the trace worker pool. `0` picks the available parallelism.
    pub worker_threads: usize,
    pub seed: u64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: 30.0,
            vertical_fov_deg: 30.0,
            range_m: 100.0,
            points_per_second: 1500,
            max_bounces: 3,
            meters_per_unit: 1.0,
            worker_threads: 0,
            seed: 0,
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> RadarResult<()> {
        for (name, fov) in [
            ("horizontal_fov_deg", self.horizontal_fov_deg),
            ("vertical_fov_deg", self.vertical_fov_deg),
        ] {
            if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
                return Err(RadarError::InvalidConfig(format!(
                    "{} must lie in (0, 180), got {}",
                    name, fov
                )));
            }
        }
        if !self.range_m.is_finite() || self.range_m <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "range_m must be positive, got {}",
                self.range_m
            )));
        }
        if !self.meters_per_unit.is_finite() || self.meters_per_unit <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "meters_per_unit must be positive, got {}",
                self.meters_per_unit
            )));
        }
        Ok(())
    }

    /// Range expressed in scene units.
    pub fn range_units(&self) -> f32 {
        self.range_m / self.meters_per_unit
    }

    /// Number of rays cast during a tick of `elapsed` seconds, truncated toward zero.
    pub fn rays_for(&self, elapsed: f32) -> usize {
        let points = self.points_per_second as f32 * elapsed;
        if points.is_finite() && points > 0.0 {
            points as usize
        } else {
            0
        }
    }
}

/// Common error type for the radar core.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed detection frame: {len} bytes is not a multiple of {record_size}")]
    MalformedFrame { len: usize, record_size: usize },
    #[error("worker pool failure: {0}")]
    WorkerPool(String),
}

pub type RadarResult<T> = Result<T, RadarError>;

/// Lifecycle shared by tick-driven processing stages.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &RadarConfig) -> RadarResult<()>;
    fn execute(&mut self, input: Self::Input) -> RadarResult<Self::Output>;
    fn cleanup(&mut self);
}
