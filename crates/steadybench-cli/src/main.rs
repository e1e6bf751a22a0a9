//! CLI driver for the steadybench microbenchmark harness.

mod affinity;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use steadybench_core::{Registry, RunObserver, RunRecord, Runner, RunnerConfig, SampleStats};
use steadybench_report::console;
use steadybench_report::structured_log::{LogEmitter, LogEntry, LogLevel};
use steadybench_report::summary;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_NO_CASES: u8 = 2;

/// Stability-driven runner for the sample container microbenchmarks.
#[derive(Debug, Parser)]
#[command(name = "steadybench")]
#[command(about = "Microbenchmark runner with CI-driven stability repetition")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Measure the benchmark cases and report results.
    Run(RunArgs),
    /// List the available benchmark cases.
    List {
        /// Only list cases whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Only run cases whose name contains this substring.
    #[arg(long)]
    filter: Option<String>,
    /// Minimum time per calibrated batch, in milliseconds.
    #[arg(long, default_value_t = 50)]
    min_time_ms: u64,
    /// Untimed warmup before calibration, in milliseconds.
    #[arg(long)]
    warmup_ms: Option<u64>,
    /// Repetitions collected before the stability criterion applies.
    #[arg(long, default_value_t = 5)]
    min_reps: u32,
    /// Repetition ceiling when stability is never reached.
    #[arg(long, default_value_t = 30)]
    max_reps: u32,
    /// Target relative 95% CI half-width (e.g. 0.03 = 3%).
    #[arg(long, default_value_t = 0.03)]
    rel_ci_threshold: f64,
    /// Fixed repetition count; disables the stability loop.
    #[arg(long)]
    reps: Option<u32>,
    /// Pin the process to a CPU core (Linux).
    #[arg(long)]
    pin_core: Option<usize>,
    /// Write a JSON summary to this path.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the structured JSONL log to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Disable the live single-line progress output.
    #[arg(long)]
    no_live: bool,
    /// Log per-measurement debug events.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run(args) => cmd_run(&args),
        Command::List { filter } => cmd_list(filter.as_deref()),
    };
    ExitCode::from(code)
}

/// Level-thresholded wrapper over the JSONL emitter.
struct CliLogger {
    emitter: LogEmitter,
    min_level: LogLevel,
}

impl CliLogger {
    fn new(log_path: Option<&std::path::Path>, min_level: LogLevel) -> std::io::Result<Self> {
        let emitter = match log_path {
            Some(path) => LogEmitter::to_file(path)?,
            None => LogEmitter::to_stderr(),
        };
        Ok(Self { emitter, min_level })
    }

    fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            let _ = self.emitter.emit_entry(entry);
        }
    }

    fn flush(&mut self) {
        let _ = self.emitter.flush();
    }
}

/// Observer that drives the live progress line and per-pair debug logging.
struct LiveReporter<'a> {
    total: usize,
    done: usize,
    failed: usize,
    worst_rel_ci: Option<f64>,
    live: bool,
    logger: &'a mut CliLogger,
}

impl<'a> LiveReporter<'a> {
    fn new(total: usize, live: bool, logger: &'a mut CliLogger) -> Self {
        Self {
            total,
            done: 0,
            failed: 0,
            worst_rel_ci: None,
            live,
            logger,
        }
    }

    fn redraw(&self, current: &str) {
        console::print_live(
            &console::render_progress_line(
                self.done,
                self.total,
                current,
                self.worst_rel_ci,
                self.failed,
            ),
            self.live,
        );
    }
}

impl RunObserver for LiveReporter<'_> {
    fn on_sample(&mut self, case: &str, size: u64, _rep: u32, _stats: &SampleStats) {
        self.redraw(&format!("{case}/{size}"));
    }

    fn on_record(&mut self, record: &RunRecord) {
        self.done += 1;
        match &record.outcome {
            steadybench_core::RunOutcome::Measured(m) => {
                if let Some(rci) = m.rel_ci95_half
                    && self.worst_rel_ci.is_none_or(|w| rci > w)
                {
                    self.worst_rel_ci = Some(rci);
                }
                self.logger.log(
                    LogEntry::new(0, LogLevel::Debug, "pair_measured")
                        .with_pair(&record.case, record.size)
                        .with_latency_ns(m.mean_ns as u64),
                );
            }
            steadybench_core::RunOutcome::Failed { message } => {
                self.failed += 1;
                self.logger.log(
                    LogEntry::new(0, LogLevel::Error, "pair_failed")
                        .with_pair(&record.case, record.size)
                        .with_details(serde_json::json!({ "message": message })),
                );
            }
        }
        self.redraw(&record.case);
    }
}

fn build_registry(filter: Option<&str>) -> Result<Registry, u8> {
    let mut registry = Registry::new();
    if let Err(err) = steadybench_samples::register_all(&mut registry) {
        eprintln!("failed to register sample cases: {err}");
        return Err(EXIT_ERROR);
    }
    if let Some(pattern) = filter {
        registry.retain_matching(pattern);
    }
    Ok(registry)
}

fn cmd_run(args: &RunArgs) -> u8 {
    let min_level = if args.quiet {
        LogLevel::Warn
    } else if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let mut logger = match CliLogger::new(args.log.as_deref(), min_level) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("failed to open log file: {err}");
            return EXIT_ERROR;
        }
    };

    let config = RunnerConfig {
        min_time: Duration::from_millis(args.min_time_ms),
        warmup: args.warmup_ms.map(Duration::from_millis),
        min_reps: args.min_reps,
        max_reps: args.max_reps,
        rel_ci_threshold: args.rel_ci_threshold,
        fixed_reps: args.reps,
    };
    if let Err(err) = config.validate() {
        logger.log(
            LogEntry::new(0, LogLevel::Error, "config_invalid")
                .with_details(serde_json::json!({ "message": err.to_string() })),
        );
        logger.flush();
        return EXIT_ERROR;
    }

    let registry = match build_registry(args.filter.as_deref()) {
        Ok(registry) => registry,
        Err(code) => return code,
    };
    if registry.is_empty() {
        logger.log(LogEntry::new(0, LogLevel::Warn, "no_cases_matched"));
        logger.flush();
        return EXIT_NO_CASES;
    }

    if let Some(core) = args.pin_core {
        match affinity::pin_to_core(core) {
            Ok(()) => logger.log(
                LogEntry::new(0, LogLevel::Debug, "pinned_to_core")
                    .with_details(serde_json::json!({ "core": core })),
            ),
            Err(err) => logger.log(
                LogEntry::new(0, LogLevel::Warn, "pin_core_failed")
                    .with_details(serde_json::json!({ "core": core, "message": err.to_string() })),
            ),
        }
    }

    logger.log(
        LogEntry::new(0, LogLevel::Info, "run_start").with_details(serde_json::json!({
            "cases": registry.len(),
            "pairs": Runner::pair_count(&registry),
            "min_time_ms": args.min_time_ms,
            "rel_ci_threshold": args.rel_ci_threshold,
        })),
    );

    let live = !args.no_live;
    let started = Instant::now();
    let runner = Runner::new(config);
    let report = {
        let mut reporter = LiveReporter::new(Runner::pair_count(&registry), live, &mut logger);
        runner.run_all_observed(&registry, &mut reporter)
    };
    console::finish_live(live);

    if report.is_empty() {
        logger.log(LogEntry::new(0, LogLevel::Warn, "no_measurements"));
        logger.flush();
        return EXIT_NO_CASES;
    }

    print!("{}", console::render_table(&report));
    let measured = report.records.len() - report.failed_count();
    println!(
        "pairs: {}, measured: {}, failed: {}",
        report.records.len(),
        measured,
        report.failed_count()
    );

    if let Some(path) = &args.output {
        if let Err(err) = summary::write_summary(path, runner.config(), &report) {
            logger.log(
                LogEntry::new(0, LogLevel::Error, "summary_write_failed")
                    .with_details(serde_json::json!({ "message": err.to_string() })),
            );
            logger.flush();
            return EXIT_ERROR;
        }
    }

    logger.log(
        LogEntry::new(0, LogLevel::Info, "run_complete")
            .with_duration_ms(started.elapsed().as_millis() as u64)
            .with_details(serde_json::json!({ "failed": report.failed_count() })),
    );
    logger.flush();

    if report.failed_count() > 0 {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

fn cmd_list(filter: Option<&str>) -> u8 {
    let registry = match build_registry(filter) {
        Ok(registry) => registry,
        Err(code) => return code,
    };
    if registry.is_empty() {
        eprintln!("no cases matched");
        return EXIT_NO_CASES;
    }
    for case in registry.iter() {
        let complexity = case
            .complexity_model()
            .map(|m| m.label())
            .unwrap_or("none");
        println!(
            "{}  sizes={:?} unit={} complexity={}",
            case.name(),
            case.size_list(),
            case.time_unit().suffix(),
            complexity
        );
    }
    EXIT_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "steadybench",
            "run",
            "--filter",
            "string",
            "--min-time-ms",
            "10",
            "--reps",
            "3",
            "--pin-core",
            "0",
            "--no-live",
            "-v",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.filter.as_deref(), Some("string"));
        assert_eq!(args.min_time_ms, 10);
        assert_eq!(args.reps, Some(3));
        assert_eq!(args.pin_core, Some(0));
        assert!(args.no_live);
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn list_accepts_filter() {
        let cli = Cli::try_parse_from(["steadybench", "list", "--filter", "vec"]).unwrap();
        assert!(matches!(cli.command, Command::List { filter: Some(f) } if f == "vec"));
    }

    #[test]
    fn verbose_and_quiet_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["steadybench", "run", "-v", "-q"]).is_err());
        assert!(Cli::try_parse_from(["steadybench", "run", "-v"]).is_ok());
        assert!(Cli::try_parse_from(["steadybench", "run", "-q"]).is_ok());
    }

    #[test]
    fn list_with_no_match_exits_with_no_cases_code() {
        assert_eq!(cmd_list(Some("zzz")), EXIT_NO_CASES);
    }

    #[test]
    fn run_with_no_match_exits_with_no_cases_code() {
        let cli = Cli::try_parse_from(["steadybench", "run", "--filter", "zzz", "--no-live"])
            .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(cmd_run(&args), EXIT_NO_CASES);
    }

    #[test]
    fn filtered_registry_keeps_matching_cases() {
        let registry = build_registry(Some("string")).unwrap();
        assert_eq!(registry.len(), 2);
        let registry = build_registry(Some("zzz")).unwrap();
        assert!(registry.is_empty());
    }
}
