//! Running latency statistics

/// Count/sum/min/max of observed durations. The average is always derived
/// from `sum / count` and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl LatencyStats {
    pub fn record(&mut self, duration_ms: f64) {
        if self.count == 0 {
            self.min = duration_ms;
            self.max = duration_ms;
        } else {
            self.min = self.min.min(duration_ms);
            self.max = self.max.max(duration_ms);
        }
        self.count += 1;
        self.sum += duration_ms;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// `sum / count`, kept inside `[min, max]` against float rounding
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some((self.sum / self.count as f64).clamp(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let stats = LatencyStats::default();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.average(), None);
        assert_eq!(stats.min(), None);
        assert_eq!(stats.max(), None);
    }

    #[test]
    fn test_min_avg_max() {
        let mut stats = LatencyStats::default();
        for duration in [100.0, 200.0, 300.0] {
            stats.record(duration);
        }

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.min(), Some(100.0));
        assert_eq!(stats.max(), Some(300.0));
        assert_eq!(stats.average(), Some(200.0));
        assert_eq!(stats.sum(), 600.0);
    }

    #[test]
    fn test_ordering_holds_after_every_sample() {
        let mut stats = LatencyStats::default();
        for duration in [0.1, 0.1, 0.1, 12.0, 0.0, 7.25, 3.3] {
            stats.record(duration);
            let (min, avg, max) = (
                stats.min().unwrap(),
                stats.average().unwrap(),
                stats.max().unwrap(),
            );
            assert!(min <= avg && avg <= max, "{} <= {} <= {}", min, avg, max);
        }
    }
}
