pub mod detection;
pub mod tick;

pub use detection::{DetectionBuffer, DetectionRecord};
pub use tick::{SensorPose, TickInput, TickOutput};
