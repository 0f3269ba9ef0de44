use crate::interface::DetectionRecord;
use crate::processing::tracer::TraceFault;

/// One sampled ray and everything its trace recorded during the current tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayDescriptor {
    /// Fraction of the field-of-view ellipse radius, in `[0, 1)`.
    pub radius_fraction: f32,
    /// Polar angle around the boresight, in `[0, 2π)`.
    pub angle: f32,
    pub hit: bool,
    pub returned_to_sensor: bool,
    /// Path length in meters when the ray came back to the sensor.
    pub total_distance: f32,
    /// Cumulative path length in meters at each recorded event.
    pub distances: Vec<f32>,
    pub relative_velocities: Vec<f32>,
    pub azimuth_altitudes: Vec<(f32, f32)>,
    pub fault: Option<TraceFault>,
}

impl RayDescriptor {
    pub fn new(radius_fraction: f32, angle: f32) -> Self {
        Self {
            radius_fraction,
            angle,
            ..Default::default()
        }
    }

    pub(crate) fn record_bounce(&mut self, depth: f32, velocity: f32, azimuth: f32, altitude: f32) {
        self.hit = true;
        self.push_event(depth, velocity, azimuth, altitude);
    }

    pub(crate) fn record_return(&mut self, depth: f32, azimuth: f32, altitude: f32) {
        self.returned_to_sensor = true;
        self.total_distance = depth;
        self.push_event(depth, 0.0, azimuth, altitude);
    }

    /// Drops everything recorded so far; a faulted ray contributes no detections.
    pub(crate) fn discard(&mut self, fault: TraceFault) {
        self.hit = false;
        self.returned_to_sensor = false;
        self.total_distance = 0.0;
        self.distances.clear();
        self.relative_velocities.clear();
        self.azimuth_altitudes.clear();
        self.fault = Some(fault);
    }

    fn push_event(&mut self, depth: f32, velocity: f32, azimuth: f32, altitude: f32) {
        self.distances.push(depth);
        self.relative_velocities.push(velocity);
        self.azimuth_altitudes.push((azimuth, altitude));
    }

    /// Number of reflective hops, excluding a terminal return to the sensor.
    pub fn bounce_count(&self) -> usize {
        self.distances.len() - usize::from(self.returned_to_sensor)
    }

    /// Detections in trace order: every bounce, then the self-return if any.
    pub fn detections(&self) -> impl Iterator<Item = DetectionRecord> + '_ {
        self.distances
            .iter()
            .zip(&self.relative_velocities)
            .zip(&self.azimuth_altitudes)
            .map(|((&depth, &velocity), &(azimuth, altitude))| {
                DetectionRecord::new(velocity, azimuth, altitude, depth)
            })
    }
}
