//! Emitter output must validate against the JSONL schema.

use steadybench_report::structured_log::{LogEmitter, LogEntry, LogLevel, validate_log_file};

fn temp_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("steadybench-log-{tag}-{}.jsonl", std::process::id()))
}

#[test]
fn emitted_file_validates_cleanly() {
    let path = temp_path("clean");
    {
        let mut emitter = LogEmitter::to_file(&path).unwrap();
        emitter.emit(LogLevel::Info, "run_start").unwrap();
        emitter
            .emit_entry(
                LogEntry::new(0, LogLevel::Debug, "pair_measured")
                    .with_pair("string_append", 64)
                    .with_latency_ns(97),
            )
            .unwrap();
        emitter
            .emit_entry(
                LogEntry::new(0, LogLevel::Info, "run_complete").with_duration_ms(1_250),
            )
            .unwrap();
        emitter.flush().unwrap();
    }

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 3);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn sequence_numbers_increase_monotonically() {
    let path = temp_path("seq");
    {
        let mut emitter = LogEmitter::to_file(&path).unwrap();
        for _ in 0..4 {
            emitter.emit(LogLevel::Debug, "tick").unwrap();
        }
        emitter.flush().unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let seqs: Vec<u64> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["seq"].as_u64().unwrap()
        })
        .collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn mixed_file_reports_only_bad_lines() {
    let path = temp_path("mixed");
    let good = r#"{"timestamp":"2026-08-25T00:00:00.000Z","seq":1,"level":"info","event":"ok"}"#;
    std::fs::write(&path, format!("{good}\nnot json\n\n{good}\n")).unwrap();

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 3);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line_number, 2);
    std::fs::remove_file(&path).unwrap();
}
