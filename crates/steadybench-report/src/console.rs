//! Console rendering: the result table and the single-line live progress bar.

use std::fmt::Write as _;
use std::io::{IsTerminal, Write as _};

use steadybench_core::{RunOutcome, RunReport};

const PROGRESS_BAR_WIDTH: usize = 30;

/// Render the full run report as a fixed-width table, followed by one line
/// per complexity fit.
#[must_use]
pub fn render_table(report: &RunReport) -> String {
    let name_width = report
        .records
        .iter()
        .map(|r| r.case.len() + 1 + digits(r.size))
        .chain(std::iter::once("benchmark".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>14}  {:>8}  {:>7}  {:>12}  {}",
        "benchmark", "time", "ci", "samples", "iters", "status"
    );
    let _ = writeln!(out, "{}", "-".repeat(name_width + 56));

    for record in &report.records {
        let label = format!("{}/{}", record.case, record.size);
        match &record.outcome {
            RunOutcome::Measured(m) => {
                let time = record.unit.from_ns(m.mean_ns);
                let ci = m
                    .rel_ci95_half
                    .map(|rci| format!("{:.2}%", rci * 100.0))
                    .unwrap_or_else(|| "n/a".to_string());
                let status = if m.stable { "ok" } else { "unstable" };
                let _ = writeln!(
                    out,
                    "{label:<name_width$}  {time:>11.2} {unit:>2}  {ci:>8}  {samples:>7}  {iters:>12}  {status}",
                    unit = record.unit.suffix(),
                    samples = m.samples,
                    iters = m.iters_per_sample,
                );
            }
            RunOutcome::Failed { message } => {
                let _ = writeln!(out, "{label:<name_width$}  FAILED: {message}");
            }
        }
    }

    for case_fit in &report.fits {
        let _ = writeln!(
            out,
            "{:<name_width$}  {} coefficient={:.3} ns rms={:.2}%",
            case_fit.case,
            case_fit.fit.big_o.label(),
            case_fit.fit.coefficient,
            case_fit.fit.rms * 100.0,
        );
    }
    out
}

/// Render the live progress line: completed pairs, current case, failures.
#[must_use]
pub fn render_progress_line(
    done: usize,
    total: usize,
    current: &str,
    worst_rel_ci: Option<f64>,
    failed: usize,
) -> String {
    let ratio = if total > 0 {
        (done as f64 / total as f64).min(1.0)
    } else {
        0.0
    };
    let filled = (PROGRESS_BAR_WIDTH as f64 * ratio) as usize;
    let bar: String = std::iter::repeat_n('█', filled)
        .chain(std::iter::repeat_n('░', PROGRESS_BAR_WIDTH - filled))
        .collect();
    let worst = match worst_rel_ci {
        Some(rci) => format!("worst {:.2}%", (rci * 100.0).min(100.0)),
        None => "worst n/a".to_string(),
    };
    format!("[{bar}] {done}/{total} pairs | {current} | {worst} | failed {failed}")
}

/// Rewrite the progress line in place. Only emits when enabled and stdout
/// is a terminal, so piped output stays clean.
pub fn print_live(line: &str, enabled: bool) {
    let mut stdout = std::io::stdout();
    if enabled && stdout.is_terminal() {
        let _ = write!(stdout, "\r\x1b[2K{line}");
        let _ = stdout.flush();
    }
}

/// Terminate the live line with a newline, if it was being drawn.
pub fn finish_live(enabled: bool) {
    let mut stdout = std::io::stdout();
    if enabled && stdout.is_terminal() {
        let _ = writeln!(stdout);
        let _ = stdout.flush();
    }
}

fn digits(mut n: u64) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use steadybench_core::{CaseFit, ComplexityFit, Measurement, RunRecord, TimeUnit};
    use steadybench_core::complexity::BigO;

    fn sample_report() -> RunReport {
        RunReport {
            records: vec![
                RunRecord {
                    case: "vec_sort".into(),
                    size: 1024,
                    unit: TimeUnit::Nanos,
                    outcome: RunOutcome::Measured(Measurement {
                        iters_per_sample: 4_000,
                        samples: 5,
                        mean_ns: 12_345.6,
                        stddev_ns: Some(120.0),
                        rel_ci95_half: Some(0.012),
                        stable: true,
                    }),
                },
                RunRecord {
                    case: "vec_sort".into(),
                    size: 8192,
                    unit: TimeUnit::Nanos,
                    outcome: RunOutcome::Failed {
                        message: "boom".into(),
                    },
                },
            ],
            fits: vec![CaseFit {
                case: "vec_sort".into(),
                fit: ComplexityFit {
                    big_o: BigO::NLogN,
                    coefficient: 1.21,
                    rms: 0.034,
                },
            }],
        }
    }

    #[test]
    fn table_lists_every_record_and_fit() {
        let table = render_table(&sample_report());
        assert!(table.contains("vec_sort/1024"));
        assert!(table.contains("12345.60 ns"));
        assert!(table.contains("1.20%"));
        assert!(table.contains("FAILED: boom"));
        assert!(table.contains("O(NlogN)"));
    }

    #[test]
    fn table_marks_unstable_measurements() {
        let mut report = sample_report();
        if let RunOutcome::Measured(m) = &mut report.records[0].outcome {
            m.stable = false;
        }
        assert!(render_table(&report).contains("unstable"));
    }

    #[test]
    fn progress_line_shows_counts_and_bar() {
        let line = render_progress_line(2, 4, "vec_sort/8192", Some(0.0412), 1);
        assert!(line.starts_with('['));
        assert!(line.contains("2/4 pairs"));
        assert!(line.contains("vec_sort/8192"));
        assert!(line.contains("worst 4.12%"));
        assert!(line.contains("failed 1"));
    }

    #[test]
    fn progress_line_handles_empty_total() {
        let line = render_progress_line(0, 0, "-", None, 0);
        assert!(line.contains("0/0 pairs"));
        assert!(line.contains("worst n/a"));
    }
}
