use crate::interface::{DetectionBuffer, DetectionRecord};
use crate::prelude::{RadarError, RadarResult};
use crate::s11n::measurement::RadarMeasurement;

const FIELD_SIZE: usize = std::mem::size_of::<f32>();

/// Packs detection buffers into frames and decodes frames back into measurements.
pub struct DetectionSerializer;

impl DetectionSerializer {
    pub fn pack(buffer: &DetectionBuffer) -> Vec<u8> {
        let mut output = Vec::with_capacity(buffer.count() * DetectionRecord::SIZE);
        Self::pack_into(buffer, &mut output);
        output
    }

    /// Overwrites `output` with the packed frame, reusing its allocation.
    pub fn pack_into(buffer: &DetectionBuffer, output: &mut Vec<u8>) {
        output.clear();
        output.reserve(buffer.count() * DetectionRecord::SIZE);
        for detection in buffer {
            for field in [
                detection.velocity,
                detection.azimuth,
                detection.altitude,
                detection.depth,
            ] {
                output.extend_from_slice(&field.to_le_bytes());
            }
        }
    }

    pub fn unpack(frame: &[u8]) -> RadarResult<RadarMeasurement> {
        if frame.len() % DetectionRecord::SIZE != 0 {
            return Err(RadarError::MalformedFrame {
                len: frame.len(),
                record_size: DetectionRecord::SIZE,
            });
        }
        let detections = frame
            .chunks_exact(DetectionRecord::SIZE)
            .map(|window| {
                DetectionRecord::new(
                    read_field(window, 0),
                    read_field(window, 1),
                    read_field(window, 2),
                    read_field(window, 3),
                )
            })
            .collect();
        Ok(RadarMeasurement::new(detections))
    }
}

fn read_field(window: &[u8], index: usize) -> f32 {
    let mut raw = [0u8; FIELD_SIZE];
    raw.copy_from_slice(&window[index * FIELD_SIZE..(index + 1) * FIELD_SIZE]);
    f32::from_le_bytes(raw)
}
