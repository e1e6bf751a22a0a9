//! Sample statistics for repeated timing measurements.

// t critical values for a 95% two-sided confidence interval, indexed by
// degrees of freedom 1..=30. Beyond 30 the normal approximation is used.
const T_CRITICAL_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];
const Z_CRITICAL_95: f64 = 1.96;

/// Accumulates nanosecond timing samples for one `(case, size)` pair.
#[derive(Debug, Clone, Default)]
pub struct SampleStats {
    samples_ns: Vec<f64>,
}

impl SampleStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value_ns: f64) {
        self.samples_ns.push(value_ns);
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.samples_ns.len()
    }

    /// Arithmetic mean, or `None` with no samples.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.samples_ns.is_empty() {
            return None;
        }
        Some(self.samples_ns.iter().sum::<f64>() / self.samples_ns.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator), or `None` below two samples.
    #[must_use]
    pub fn stddev(&self) -> Option<f64> {
        let n = self.samples_ns.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let var = self
            .samples_ns
            .iter()
            .map(|x| (x - mean) * (x - mean))
            .sum::<f64>()
            / (n - 1) as f64;
        Some(var.sqrt())
    }

    /// Relative half-width of the 95% confidence interval around the mean.
    ///
    /// `None` below two samples or when the mean is zero.
    #[must_use]
    pub fn rel_ci95_half(&self) -> Option<f64> {
        let n = self.samples_ns.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        if mean == 0.0 {
            return None;
        }
        let critical = T_CRITICAL_95
            .get(n - 2)
            .copied()
            .unwrap_or(Z_CRITICAL_95);
        let half = critical * (self.stddev()? / (n as f64).sqrt());
        Some(half / mean)
    }

    /// Whether the measurement has settled: at least `min_reps` samples and
    /// a relative CI half-width at or under `threshold`.
    #[must_use]
    pub fn is_stable(&self, threshold: f64, min_reps: u32) -> bool {
        if self.count() < min_reps as usize {
            return false;
        }
        match self.rel_ci95_half() {
            Some(rci) => rci <= threshold,
            None => false,
        }
    }
}
