use crate::interface::SensorPose;
use crate::math::safe_normal;
use crate::scene::RayHit;
use nalgebra::Vector3;

/// Turns hit geometry into detection features for one tick's sensor pose.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    pose: SensorPose,
    ego_velocity: Vector3<f32>,
    meters_per_unit: f32,
}

impl FeatureExtractor {
    pub fn new(pose: SensorPose, elapsed: f32, meters_per_unit: f32) -> Self {
        Self {
            pose,
            ego_velocity: pose.ego_velocity(elapsed),
            meters_per_unit,
        }
    }

    pub fn pose(&self) -> &SensorPose {
        &self.pose
    }

    /// Sensor velocity in scene units per second.
    pub fn ego_velocity(&self) -> Vector3<f32> {
        self.ego_velocity
    }

    /// Closing speed in m/s between the sensor and the struck object, projected on
    /// the line of sight from `origin` to the hit point. Positive when approaching.
    pub fn relative_velocity(&self, origin: &Vector3<f32>, hit: &RayHit) -> Option<f32> {
        let line_of_sight = safe_normal(&(hit.point - origin))?;
        let delta = hit.object_velocity - self.ego_velocity;
        let closing = -delta.dot(&line_of_sight) * self.meters_per_unit;
        closing.is_finite().then_some(closing)
    }

    /// Azimuth and altitude of `point` in the sensor's local frame, in radians.
    pub fn azimuth_altitude(&self, point: &Vector3<f32>) -> Option<(f32, f32)> {
        let local = self.pose.to_local(&(point - self.pose.position));
        let local = safe_normal(&local)?;
        let azimuth = local.y.atan2(local.x);
        let altitude = local.z.clamp(-1.0, 1.0).asin();
        Some((azimuth, altitude))
    }

    /// Path length in meters for `distance` scene units.
    pub fn depth(&self, distance: f32) -> f32 {
        distance * self.meters_per_unit
    }
}
