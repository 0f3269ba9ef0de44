//! Wire format for detection frames.
//!
//! A frame is a bare sequence of 16-byte records, `[velocity, azimuth, altitude,
//! depth]` as little-endian IEEE-754 `f32`. There is no header or count field;
//! the record count is the frame length divided by 16.

pub mod measurement;
pub mod serializer;

pub use measurement::RadarMeasurement;
pub use serializer::DetectionSerializer;
