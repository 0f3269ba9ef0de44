//! Core detection pipeline for the ray-traced radar sensor.
//!
//! Rays are sampled inside the sensor's elliptical field of view, traced through
//! multiple reflections against a scene, reduced to compact detection records and
//! packed into a fixed little-endian wire format for transport.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod s11n;
pub mod scene;
pub mod telemetry;

pub use prelude::{ProcessingStage, RadarConfig, RadarError, RadarResult};
