use serde::{Deserialize, Serialize};
use std::mem::size_of;

/// A single radar detection: four packed `f32` values in wire order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Closing velocity along the line of sight in m/s. Positive means approaching.
    pub velocity: f32,
    /// Sensor-local horizontal angle in radians.
    pub azimuth: f32,
    /// Sensor-local elevation angle in radians.
    pub altitude: f32,
    /// Total path length travelled by the ray, bounces included, in meters.
    pub depth: f32,
}

const _: () = assert!(size_of::<f32>() == size_of::<u32>(), "invalid float size");
const _: () = assert!(
    size_of::<DetectionRecord>() == 4 * size_of::<f32>(),
    "invalid DetectionRecord size"
);

impl DetectionRecord {
    /// Size of one record on the wire.
    pub const SIZE: usize = size_of::<DetectionRecord>();

    pub fn new(velocity: f32, azimuth: f32, altitude: f32, depth: f32) -> Self {
        Self {
            velocity,
            azimuth,
            altitude,
            depth,
        }
    }
}

/// Per-tick detection storage with a reserved capacity that survives `clear`.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuffer {
    detections: Vec<DetectionRecord>,
    reserved: usize,
    overflowed: bool,
}

impl DetectionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(resolution: usize) -> Self {
        let mut buffer = Self::new();
        buffer.set_capacity(resolution);
        buffer
    }

    /// Drops every detection and reserves room for exactly `resolution` records.
    ///
    /// This reallocates. Call it when the configuration changes, never once per tick.
    pub fn set_capacity(&mut self, resolution: usize) {
        self.detections.clear();
        self.detections.shrink_to_fit();
        self.detections.reserve_exact(resolution);
        self.reserved = resolution;
        self.overflowed = false;
    }

    /// Forgets the current detections without touching the reserved storage.
    pub fn clear(&mut self) {
        self.detections.clear();
        self.overflowed = false;
    }

    /// Adds a detection after the ones already written.
    ///
    /// Going past the reserved capacity still succeeds but marks the buffer as
    /// overflowed until the next `clear`.
    pub fn append(&mut self, detection: DetectionRecord) {
        if self.detections.len() >= self.reserved {
            self.overflowed = true;
        }
        self.detections.push(detection);
    }

    pub fn count(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Reserved capacity, as last set by `set_capacity`.
    pub fn capacity(&self) -> usize {
        self.reserved
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn get(&self, index: usize) -> Option<&DetectionRecord> {
        self.detections.get(index)
    }

    /// Detections in append order.
    pub fn records(&self) -> &[DetectionRecord] {
        &self.detections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.detections.iter()
    }
}

impl<'a> IntoIterator for &'a DetectionBuffer {
    type Item = &'a DetectionRecord;
    type IntoIter = std::slice::Iter<'a, DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
