pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }

    pub fn mean(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f32>() / samples.len() as f32
    }

    pub fn max(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }

    #[test]
    fn mean_and_max_of_depths() {
        assert_eq!(StatsHelper::mean(&[10.0, 25.0, 45.0]), 80.0 / 3.0);
        assert_eq!(StatsHelper::max(&[10.0, 25.0, 45.0]), 45.0);
        assert_eq!(StatsHelper::max(&[]), 0.0);
    }

    #[test]
    fn max_of_receding_velocities_stays_negative() {
        assert_eq!(StatsHelper::max(&[-3.0, -1.5, -7.0]), -1.5);
    }
}
