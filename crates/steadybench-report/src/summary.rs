//! Versioned JSON summary of a run, written atomically.

use std::path::Path;

use serde::{Deserialize, Serialize};
use steadybench_core::{RunReport, RunnerConfig};

use crate::ReportError;

const SUMMARY_VERSION: u32 = 1;

/// Runner parameters echoed into the summary so results are interpretable
/// without the invocation that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryParams {
    pub min_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_ms: Option<u64>,
    pub min_reps: u32,
    pub max_reps: u32,
    pub rel_ci_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_reps: Option<u32>,
}

impl From<&RunnerConfig> for SummaryParams {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            min_time_ms: config.min_time.as_millis() as u64,
            warmup_ms: config.warmup.map(|w| w.as_millis() as u64),
            min_reps: config.min_reps,
            max_reps: config.max_reps,
            rel_ci_threshold: config.rel_ci_threshold,
            fixed_reps: config.fixed_reps,
        }
    }
}

/// Top-level summary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub version: u32,
    pub params: SummaryParams,
    #[serde(flatten)]
    pub report: RunReport,
}

impl Summary {
    #[must_use]
    pub fn build(config: &RunnerConfig, report: &RunReport) -> Self {
        Self {
            version: SUMMARY_VERSION,
            params: SummaryParams::from(config),
            report: report.clone(),
        }
    }
}

/// Serialize `value` as pretty JSON and write it atomically: a temp file in
/// the target directory first, then a rename over the destination, so the
/// summary is never observable half-written.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(value)?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "summary.json".to_string());
    let tmp_name = format!(".{}.{}.tmp", file_name, std::process::id());
    let tmp_path = match dir {
        Some(dir) => dir.join(&tmp_name),
        None => Path::new(&tmp_name).to_path_buf(),
    };

    let write_result = std::fs::write(&tmp_path, json.as_bytes())
        .and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(err) = write_result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ReportError::Io(err));
    }
    Ok(())
}

/// Write the summary for a finished run.
pub fn write_summary(
    path: &Path,
    config: &RunnerConfig,
    report: &RunReport,
) -> Result<(), ReportError> {
    write_json_atomic(path, &Summary::build(config, report))
}
