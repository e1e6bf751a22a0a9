//! Error types for registration and measurement.

use thiserror::Error;

/// Registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate benchmark case: {name}")]
    DuplicateCase { name: String },
}

/// Measurement setup failures.
///
/// A workload panicking during timed execution is not represented here; it
/// is recorded per `(case, size)` as [`crate::record::RunOutcome::Failed`]
/// so sibling measurements keep running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeasureError {
    #[error("invalid runner config: {reason}")]
    InvalidConfig { reason: String },
}
