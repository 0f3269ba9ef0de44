use crate::interface::DetectionRecord;
use std::ops::Index;

/// Read-only detections decoded from a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarMeasurement {
    detections: Vec<DetectionRecord>,
}

impl RadarMeasurement {
    pub(crate) fn new(detections: Vec<DetectionRecord>) -> Self {
        Self { detections }
    }

    pub fn detection_amount(&self) -> usize {
        self.detections.len()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DetectionRecord> {
        self.detections.get(index)
    }

    pub fn as_slice(&self) -> &[DetectionRecord] {
        &self.detections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.detections.iter()
    }
}

impl Index<usize> for RadarMeasurement {
    type Output = DetectionRecord;

    fn index(&self, index: usize) -> &DetectionRecord {
        &self.detections[index]
    }
}

impl<'a> IntoIterator for &'a RadarMeasurement {
    type Item = &'a DetectionRecord;
    type IntoIter = std::slice::Iter<'a, DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
