//! Measurement engine: calibration, repetition, and result collection.
//!
//! For every `(case, size)` pair the runner performs, in order:
//! 1. optional untimed warmup,
//! 2. adaptive calibration: grow the batch iteration count geometrically
//!    until one timed batch exceeds `min_time`, amortizing timer overhead,
//! 3. repeated timed batches at the settled count, until the relative 95%
//!    CI half-width falls under the configured threshold (bounded by
//!    `min_reps`/`max_reps`, or pinned by `fixed_reps`).
//!
//! Workload panics are caught per pair and recorded as failures; they do
//! not disturb sibling sizes or other cases.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::case::BenchmarkCase;
use crate::complexity;
use crate::error::MeasureError;
use crate::record::{CaseFit, Measurement, RunOutcome, RunRecord, RunReport};
use crate::registry::Registry;
use crate::stats::SampleStats;

// Hard ceiling on a single batch to keep runaway-cheap workloads bounded.
const MAX_ITERS_PER_BATCH: u64 = 1_000_000_000;

/// Runner tuning knobs.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Minimum wall-clock time a calibrated batch must take.
    pub min_time: Duration,
    /// Optional untimed warmup executed before calibration.
    pub warmup: Option<Duration>,
    /// Repetitions collected before the stability criterion applies.
    pub min_reps: u32,
    /// Repetition ceiling when stability is never reached.
    pub max_reps: u32,
    /// Target relative 95% CI half-width, e.g. 0.03 for 3%.
    pub rel_ci_threshold: f64,
    /// Exact repetition count override; disables the stability loop.
    pub fixed_reps: Option<u32>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            min_time: Duration::from_millis(50),
            warmup: None,
            min_reps: 5,
            max_reps: 30,
            rel_ci_threshold: 0.03,
            fixed_reps: None,
        }
    }
}

impl RunnerConfig {
    /// Check argument consistency before running.
    pub fn validate(&self) -> Result<(), MeasureError> {
        let fail = |reason: &str| {
            Err(MeasureError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.min_time.is_zero() {
            return fail("min_time must be > 0");
        }
        if self.min_reps == 0 {
            return fail("min_reps must be > 0");
        }
        if self.max_reps < self.min_reps {
            return fail("max_reps must be >= min_reps");
        }
        if !(self.rel_ci_threshold > 0.0 && self.rel_ci_threshold <= 1.0) {
            return fail("rel_ci_threshold must be in (0, 1]");
        }
        if self.fixed_reps == Some(0) {
            return fail("fixed_reps must be > 0 when set");
        }
        Ok(())
    }
}

/// Callback surface for live reporting. All methods default to no-ops.
pub trait RunObserver {
    /// A repetition sample was collected for `(case, size)`.
    fn on_sample(&mut self, _case: &str, _size: u64, _rep: u32, _stats: &SampleStats) {}
    /// A `(case, size)` record was finalized.
    fn on_record(&mut self, _record: &RunRecord) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Executes registered cases and collects a [`RunReport`].
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Total `(case, size)` pairs the registry will produce.
    #[must_use]
    pub fn pair_count(registry: &Registry) -> usize {
        registry.iter().map(|c| c.size_list().len()).sum()
    }

    /// Measure every `(case, size)` pair in the registry.
    ///
    /// Structurally idempotent: repeated calls against the same registry
    /// yield the same key sequence (times naturally vary).
    pub fn run_all(&self, registry: &Registry) -> RunReport {
        self.run_all_observed(registry, &mut NullObserver)
    }

    /// [`Runner::run_all`] with a live observer.
    pub fn run_all_observed(
        &self,
        registry: &Registry,
        observer: &mut dyn RunObserver,
    ) -> RunReport {
        // Workload panics are data here, not crashes; keep the default
        // hook from spraying payloads and backtraces over the live
        // progress line and the stderr log stream mid-run.
        let _hook = HookSilencer::install();
        let mut report = RunReport::default();
        for case in registry.iter() {
            let mut points: Vec<(u64, f64)> = Vec::with_capacity(case.size_list().len());
            for &size in case.size_list() {
                let outcome = self.measure_pair(case, size, observer);
                if let Some(m) = outcome.measurement() {
                    points.push((size, m.mean_ns));
                }
                let record = RunRecord {
                    case: case.name().to_string(),
                    size,
                    unit: case.time_unit(),
                    outcome,
                };
                observer.on_record(&record);
                report.records.push(record);
            }
            if let Some(model) = case.complexity_model()
                && let Some(fit) = complexity::fit(&points, model)
            {
                report.fits.push(CaseFit {
                    case: case.name().to_string(),
                    fit,
                });
            }
        }
        report
    }

    fn measure_pair(
        &self,
        case: &BenchmarkCase,
        size: u64,
        observer: &mut dyn RunObserver,
    ) -> RunOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.measure_pair_inner(case, size, observer)
        }));
        match result {
            Ok(measurement) => RunOutcome::Measured(measurement),
            Err(payload) => RunOutcome::Failed {
                message: panic_message(payload.as_ref()),
            },
        }
    }

    fn measure_pair_inner(
        &self,
        case: &BenchmarkCase,
        size: u64,
        observer: &mut dyn RunObserver,
    ) -> Measurement {
        if let Some(warmup) = self.config.warmup {
            let start = Instant::now();
            while start.elapsed() < warmup {
                case.run(size);
            }
        }

        let (iters, first_batch) = self.calibrate(case, size);

        let mut stats = SampleStats::new();
        stats.add(per_iter_ns(first_batch, iters));
        observer.on_sample(case.name(), size, 1, &stats);

        let target_reps = self.config.fixed_reps;
        loop {
            let done = match target_reps {
                Some(fixed) => stats.count() >= fixed as usize,
                None => {
                    stats.count() >= self.config.max_reps as usize
                        || stats.is_stable(self.config.rel_ci_threshold, self.config.min_reps)
                }
            };
            if done {
                break;
            }
            let elapsed = timed_batch(case, size, iters);
            stats.add(per_iter_ns(elapsed, iters));
            observer.on_sample(case.name(), size, stats.count() as u32, &stats);
        }

        let stable = match target_reps {
            Some(_) => true,
            None => stats.is_stable(self.config.rel_ci_threshold, self.config.min_reps),
        };
        Measurement {
            iters_per_sample: iters,
            samples: stats.count() as u32,
            mean_ns: stats.mean().unwrap_or(0.0).max(0.0),
            stddev_ns: stats.stddev(),
            rel_ci95_half: stats.rel_ci95_half(),
            stable,
        }
    }

    /// Grow the batch size until one batch takes at least `min_time`.
    /// Returns the settled iteration count and the last batch's elapsed
    /// time, which doubles as the first repetition sample.
    fn calibrate(&self, case: &BenchmarkCase, size: u64) -> (u64, Duration) {
        let mut iters: u64 = 1;
        loop {
            let elapsed = timed_batch(case, size, iters);
            if elapsed >= self.config.min_time || iters >= MAX_ITERS_PER_BATCH {
                return (iters, elapsed);
            }
            iters = next_iter_count(iters, elapsed, self.config.min_time);
        }
    }
}

/// Swaps in a no-op panic hook; restores the previous hook on drop, even
/// when the run itself unwinds.
struct HookSilencer {
    prev: Option<Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>>,
}

impl HookSilencer {
    fn install() -> Self {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        Self { prev: Some(prev) }
    }
}

impl Drop for HookSilencer {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            panic::set_hook(prev);
        }
    }
}

fn timed_batch(case: &BenchmarkCase, size: u64, iters: u64) -> Duration {
    let start = Instant::now();
    for _ in 0..iters {
        case.run(size);
    }
    start.elapsed()
}

fn per_iter_ns(elapsed: Duration, iters: u64) -> f64 {
    elapsed.as_nanos() as f64 / iters as f64
}

/// Predict the iteration count needed to reach `min_time`, with a 40%
/// overshoot margin, clamped to at most 10x growth per step.
fn next_iter_count(iters: u64, elapsed: Duration, min_time: Duration) -> u64 {
    let elapsed_s = elapsed.as_secs_f64();
    let predicted = if elapsed_s > 0.0 {
        (iters as f64 * (min_time.as_secs_f64() / elapsed_s) * 1.4).ceil() as u64
    } else {
        iters.saturating_mul(10)
    };
    predicted
        .clamp(iters + 1, iters.saturating_mul(10))
        .min(MAX_ITERS_PER_BATCH)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        RunnerConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let reject = |config: RunnerConfig| {
            assert!(matches!(
                config.validate(),
                Err(MeasureError::InvalidConfig { .. })
            ));
        };
        reject(RunnerConfig {
            min_time: Duration::ZERO,
            ..RunnerConfig::default()
        });
        reject(RunnerConfig {
            min_reps: 0,
            ..RunnerConfig::default()
        });
        reject(RunnerConfig {
            min_reps: 10,
            max_reps: 5,
            ..RunnerConfig::default()
        });
        reject(RunnerConfig {
            rel_ci_threshold: 0.0,
            ..RunnerConfig::default()
        });
        reject(RunnerConfig {
            rel_ci_threshold: 1.5,
            ..RunnerConfig::default()
        });
        reject(RunnerConfig {
            fixed_reps: Some(0),
            ..RunnerConfig::default()
        });
    }

    #[test]
    fn next_iter_count_grows_and_is_clamped() {
        let min_time = Duration::from_millis(50);
        // Far from the target: clamped to 10x.
        assert_eq!(
            next_iter_count(1, Duration::from_nanos(10), min_time),
            10
        );
        // Close to the target: modest growth, at least +1.
        let near = next_iter_count(100, Duration::from_millis(49), min_time);
        assert!(near > 100 && near <= 1_000);
        // Zero elapsed (timer granularity): geometric fallback.
        assert_eq!(next_iter_count(4, Duration::ZERO, min_time), 40);
    }

    #[test]
    fn per_iter_ns_divides_evenly() {
        assert_eq!(per_iter_ns(Duration::from_nanos(1_000), 10), 100.0);
    }

    #[test]
    fn panic_message_extracts_str_and_string() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("kaput"));
        assert_eq!(panic_message(boxed.as_ref()), "kaput");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(boxed.as_ref()), "operation panicked");
    }
}
