use nalgebra::{UnitQuaternion, Vector3};
use serde::Serialize;

/// World pose of the sensor for one tick, plus where it was on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPose {
    pub position: Vector3<f32>,
    pub previous_position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl SensorPose {
    pub fn stationary(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            previous_position: position,
            orientation,
        }
    }

    /// Pose for the next tick; the current position becomes the previous one.
    pub fn advanced(&self, position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            previous_position: self.position,
            orientation,
        }
    }

    /// Sensor velocity in scene units per second.
    pub fn ego_velocity(&self, elapsed: f32) -> Vector3<f32> {
        if elapsed.is_finite() && elapsed > 0.0 {
            (self.position - self.previous_position) / elapsed
        } else {
            Vector3::zeros()
        }
    }

    pub fn to_world(&self, local: &Vector3<f32>) -> Vector3<f32> {
        self.orientation.transform_vector(local)
    }

    pub fn to_local(&self, world: &Vector3<f32>) -> Vector3<f32> {
        self.orientation.inverse_transform_vector(world)
    }
}

impl Default for SensorPose {
    fn default() -> Self {
        Self::stationary(Vector3::zeros(), UnitQuaternion::identity())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Seconds since the previous tick.
    pub elapsed_time: f32,
    pub pose: SensorPose,
}

/// Summary of a finished tick. The detections themselves stay in the sensor's buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickOutput {
    pub rays: usize,
    pub detections: usize,
    pub returned_rays: usize,
    pub faulted_rays: usize,
    pub overflowed: bool,
}
