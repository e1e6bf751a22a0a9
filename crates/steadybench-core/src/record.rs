//! Measurement results.

use serde::{Deserialize, Serialize};

use crate::case::TimeUnit;
use crate::complexity::ComplexityFit;

/// Statistics for one successful `(case, size)` measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Iterations per timed batch, as settled by calibration.
    pub iters_per_sample: u64,
    /// Number of repetition samples collected.
    pub samples: u32,
    /// Mean time per iteration in nanoseconds.
    pub mean_ns: f64,
    /// Sample standard deviation across repetitions (two samples or more).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev_ns: Option<f64>,
    /// Relative 95% CI half-width (two samples or more).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_ci95_half: Option<f64>,
    /// Whether the stability criterion was met before `max_reps` ran out.
    pub stable: bool,
}

/// Outcome of one `(case, size)` measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Measured(Measurement),
    /// The workload panicked during timed execution. Only this pair is
    /// affected; sibling sizes and other cases still run.
    Failed { message: String },
}

impl RunOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    #[must_use]
    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            RunOutcome::Measured(m) => Some(m),
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// One row of the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub case: String,
    pub size: u64,
    pub unit: TimeUnit,
    pub outcome: RunOutcome,
}

/// Complexity fit for a case that opted in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFit {
    pub case: String,
    pub fit: ComplexityFit,
}

/// All records of one `run_all` invocation, in registration order, then
/// configured size order within each case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub records: Vec<RunRecord>,
    pub fits: Vec<CaseFit>,
}

impl RunReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_failed())
            .count()
    }

    /// `(case, size)` keys in report order.
    #[must_use]
    pub fn keys(&self) -> Vec<(&str, u64)> {
        self.records
            .iter()
            .map(|r| (r.case.as_str(), r.size))
            .collect()
    }
}
