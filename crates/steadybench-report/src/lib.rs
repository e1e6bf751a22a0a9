//! Result rendering and persistence for steadybench.
//!
//! - [`console`]: fixed-width result tables and the live progress line
//! - [`summary`]: versioned JSON summary, written atomically
//! - [`structured_log`]: JSONL log entries + emitter + validation

#![forbid(unsafe_code)]

pub mod console;
pub mod structured_log;
pub mod summary;

use thiserror::Error;

/// Failures while persisting report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
