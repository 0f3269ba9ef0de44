use crate::interface::TickOutput;
use serde::Serialize;
use std::sync::Mutex;

/// Running counters across every tick a sensor has processed.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: usize,
    pub rays: usize,
    pub detections: usize,
    pub returned_rays: usize,
    pub faulted_rays: usize,
    pub capacity_overflows: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_tick(&self, output: &TickOutput) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
            metrics.rays += output.rays;
            metrics.detections += output.detections;
            metrics.returned_rays += output.returned_rays;
            metrics.faulted_rays += output.faulted_rays;
            if output.overflowed {
                metrics.capacity_overflows += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = MetricsSnapshot::default();
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_tick_outputs() {
        let recorder = MetricsRecorder::new();
        recorder.record_tick(&TickOutput {
            rays: 10,
            detections: 4,
            returned_rays: 1,
            faulted_rays: 2,
            overflowed: false,
        });
        recorder.record_tick(&TickOutput {
            rays: 5,
            detections: 7,
            overflowed: true,
            ..Default::default()
        });

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.rays, 15);
        assert_eq!(snapshot.detections, 11);
        assert_eq!(snapshot.faulted_rays, 2);
        assert_eq!(snapshot.capacity_overflows, 1);

        recorder.reset();
        assert_eq!(recorder.snapshot(), MetricsSnapshot::default());
    }
}
