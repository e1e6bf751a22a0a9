//! Micro-benchmark harness core for steadybench.
//!
//! This crate provides:
//! - [`BenchmarkCase`]: a named, size-parameterized timing experiment
//! - [`Registry`]: ordered case registry with duplicate rejection
//! - [`Runner`]: adaptive calibration + stability-driven measurement
//! - [`sink`]: the do-not-optimize escape hatch workloads feed results through
//! - [`BigO`] fitting: post-hoc asymptotic complexity estimation
//!
//! Rendering and persistence of results live in `steadybench-report`;
//! workloads live in `steadybench-samples`.

pub mod case;
pub mod complexity;
pub mod error;
pub mod record;
pub mod registry;
pub mod runner;
pub mod sink;
pub mod stats;

pub use case::{BenchmarkCase, Operation, TimeUnit};
pub use complexity::{BigO, ComplexityFit};
pub use error::{MeasureError, RegistryError};
pub use record::{CaseFit, Measurement, RunOutcome, RunRecord, RunReport};
pub use registry::Registry;
pub use runner::{RunObserver, Runner, RunnerConfig};
pub use stats::SampleStats;
