use rtradar::interface::{DetectionRecord, TickOutput};
use rtradar::math::StatsHelper;
use rtradar::s11n::RadarMeasurement;
use serde::Serialize;

const SAMPLE_SIZE: usize = 8;

/// JSON summary of the latest published frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameSummary {
    pub tick: usize,
    pub rays: usize,
    pub detections: usize,
    pub returned_rays: usize,
    pub faulted_rays: usize,
    pub overflowed: bool,
    pub frame_bytes: usize,
    pub depth_mean: f32,
    pub depth_max: f32,
    pub sample: Vec<DetectionRecord>,
}

impl FrameSummary {
    pub fn new(tick: usize, output: &TickOutput, measurement: &RadarMeasurement, frame_bytes: usize) -> Self {
        let depths: Vec<f32> = measurement.iter().map(|d| d.depth).collect();
        Self {
            tick,
            rays: output.rays,
            detections: measurement.len(),
            returned_rays: output.returned_rays,
            faulted_rays: output.faulted_rays,
            overflowed: output.overflowed,
            frame_bytes,
            depth_mean: StatsHelper::mean(&depths),
            depth_max: StatsHelper::max(&depths),
            sample: measurement.iter().take(SAMPLE_SIZE).copied().collect(),
        }
    }
}
