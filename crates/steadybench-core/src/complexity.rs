//! Asymptotic complexity fitting over measured `(size, time)` pairs.
//!
//! Fits `time = coefficient * f(n)` by least squares on the transformed
//! size variable; goodness of fit is the root-mean-square error normalized
//! by the mean measured time. `BigO::Auto` tries every concrete model and
//! keeps the one with the smallest RMS.

use serde::{Deserialize, Serialize};

/// Candidate growth models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigO {
    O1,
    LogN,
    N,
    NLogN,
    NSquared,
    NCubed,
    /// Pick the concrete model with the best fit.
    Auto,
}

const AUTO_CANDIDATES: &[BigO] = &[
    BigO::O1,
    BigO::LogN,
    BigO::N,
    BigO::NLogN,
    BigO::NSquared,
    BigO::NCubed,
];

impl BigO {
    /// Human-readable label, e.g. `O(NlogN)`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BigO::O1 => "O(1)",
            BigO::LogN => "O(logN)",
            BigO::N => "O(N)",
            BigO::NLogN => "O(NlogN)",
            BigO::NSquared => "O(N^2)",
            BigO::NCubed => "O(N^3)",
            BigO::Auto => "O(auto)",
        }
    }

    /// Evaluate the transformed size variable `f(n)`.
    fn eval(self, n: f64) -> f64 {
        match self {
            BigO::O1 => 1.0,
            BigO::LogN => n.max(2.0).log2(),
            BigO::N => n,
            BigO::NLogN => n * n.max(2.0).log2(),
            BigO::NSquared => n * n,
            BigO::NCubed => n * n * n,
            BigO::Auto => f64::NAN,
        }
    }
}

/// Result of fitting one model to the measured points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityFit {
    pub big_o: BigO,
    /// Leading coefficient in nanoseconds per `f(n)`.
    pub coefficient: f64,
    /// RMS error normalized by the mean measured time.
    pub rms: f64,
}

/// Fit the requested model (or the best of all models for `Auto`) to the
/// `(size, mean_ns)` points. Returns `None` below two points.
#[must_use]
pub fn fit(points: &[(u64, f64)], requested: BigO) -> Option<ComplexityFit> {
    if points.len() < 2 {
        return None;
    }
    match requested {
        BigO::Auto => AUTO_CANDIDATES
            .iter()
            .map(|&candidate| least_squares(points, candidate))
            .min_by(|a, b| a.rms.total_cmp(&b.rms)),
        concrete => Some(least_squares(points, concrete)),
    }
}

fn least_squares(points: &[(u64, f64)], model: BigO) -> ComplexityFit {
    let mut sum_tf = 0.0;
    let mut sum_ff = 0.0;
    let mut sum_t = 0.0;
    for &(size, time_ns) in points {
        let f = model.eval(size as f64);
        sum_tf += time_ns * f;
        sum_ff += f * f;
        sum_t += time_ns;
    }
    let coefficient = if sum_ff > 0.0 { sum_tf / sum_ff } else { 0.0 };
    let mean_t = sum_t / points.len() as f64;

    let mut sum_sq_err = 0.0;
    for &(size, time_ns) in points {
        let predicted = coefficient * model.eval(size as f64);
        let err = time_ns - predicted;
        sum_sq_err += err * err;
    }
    let rms_abs = (sum_sq_err / points.len() as f64).sqrt();
    let rms = if mean_t > 0.0 { rms_abs / mean_t } else { rms_abs };

    ComplexityFit {
        big_o: model,
        coefficient,
        rms,
    }
}
