mod common;
use crate::common::{init_tracing, workspace_tracker, CsvWorkspace};

use std::error::Error;
use std::fs;

use serde_json::Value;

use csvforward::tracker::{TrackerState, STATE_FILE_NAME};

type TestResult = Result<(), Box<dyn Error>>;

const HEADER: &str = "timestamp,user,action,status";

fn run_pass(ws: &CsvWorkspace, state: TrackerState) -> (TrackerState, Vec<Value>) {
    let mut tracker = workspace_tracker(ws);
    let mut out: Vec<u8> = Vec::new();
    let (state, _summary) = tracker.run_pass(state, &mut out);
    let events = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (state, events)
}

/// Each `once` invocation starts a fresh tracker from the persisted state,
/// exactly like separate process runs.
fn once(ws: &CsvWorkspace) -> Vec<Value> {
    let tracker = workspace_tracker(ws);
    let state = tracker.load_state();
    run_pass(ws, state).1
}

#[test]
fn three_once_runs_emit_two_then_zero_then_one() -> TestResult {
    init_tracing();

    let ws = CsvWorkspace::new()?;
    ws.write_csv(
        "a.csv",
        HEADER,
        &[
            "2024-01-15 10:30:00,alice,login,success",
            "2024-01-15 10:31:00,bob,view_page,success",
        ],
    )?;

    let first = once(&ws);
    assert_eq!(first.len(), 2);
    for event in &first {
        assert_eq!(event["source"], "a.csv");
        assert_eq!(event["sourcetype"], "csv_data");
    }
    assert_eq!(first[0]["event"]["user"], "alice");
    assert_eq!(first[1]["event"]["user"], "bob");
    assert_eq!(first[0]["time"].as_f64(), Some(1_705_314_600.0));

    let state = workspace_tracker(&ws).load_state();
    let path = fs::canonicalize(ws.data_dir().join("a.csv"))?;
    assert_eq!(state.last_row(&path), 2);

    let second = once(&ws);
    assert!(second.is_empty(), "unchanged file must not re-emit: {second:?}");

    ws.append_rows("a.csv", &["2024-01-15 10:32:00,charlie,download,failed"])?;
    let third = once(&ws);
    assert_eq!(third.len(), 1);
    assert_eq!(third[0]["event"]["user"], "charlie");
    assert_eq!(third[0]["event"]["status"], "failed");

    let state = workspace_tracker(&ws).load_state();
    assert_eq!(state.last_row(&path), 3);

    Ok(())
}

#[test]
fn events_keep_column_order_and_wire_layout() -> TestResult {
    init_tracing();

    let ws = CsvWorkspace::new()?;
    ws.write_csv("a.csv", HEADER, &["2024-01-15 10:30:00,alice,login,success"])?;

    let mut tracker = workspace_tracker(&ws);
    let mut out: Vec<u8> = Vec::new();
    tracker.run_pass(TrackerState::new(), &mut out);

    let line = String::from_utf8(out)?;
    assert!(line.ends_with('\n'));
    assert_eq!(line.lines().count(), 1);
    assert!(
        line.starts_with(r#"{"time":1705314600.0,"source":"a.csv","sourcetype":"csv_data","event":{"timestamp":"#),
        "unexpected layout: {line}"
    );
    assert!(line.contains(r#""user":"alice","action":"login","status":"success""#));
    assert!(!line.contains("\"host\""));
    assert!(!line.contains("\"index\""));

    Ok(())
}

#[test]
fn state_file_is_written_only_when_records_are_emitted() -> TestResult {
    init_tracing();

    let ws = CsvWorkspace::new()?;
    let state_file = ws.state_dir().join(STATE_FILE_NAME);

    // Header-only file: tracked, but nothing emitted.
    ws.write_csv("empty.csv", HEADER, &[])?;
    let mut tracker = workspace_tracker(&ws);
    let (state, summary) = tracker.run_pass(TrackerState::new(), &mut std::io::sink());
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.emitted, 0);
    assert!(!summary.persisted);
    assert!(!state_file.exists());
    assert_eq!(state.len(), 1);

    ws.write_csv("b.csv", HEADER, &["2024-01-15 10:30:00,alice,login,success"])?;
    let (_state, summary) = tracker.run_pass(state, &mut std::io::sink());
    assert_eq!(summary.emitted, 1);
    assert!(summary.persisted);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&state_file)?)?;
    let key = fs::canonicalize(ws.data_dir().join("b.csv"))?;
    let entry = &saved[&*key.to_string_lossy()];
    assert_eq!(entry["last_row"], 1);
    assert!(entry["last_hash"].as_str().is_some_and(|h| h.len() == 64));
    assert!(entry["last_size"].as_u64().is_some());
    assert!(entry["last_mtime"].as_f64().is_some());

    Ok(())
}

#[test]
fn several_files_are_each_emitted_in_row_order() -> TestResult {
    init_tracing();

    let ws = CsvWorkspace::new()?;
    ws.write_csv("a.csv", "id,name", &["1,one", "2,two"])?;
    ws.write_csv("b.csv", "id,name", &["10,ten", "11,eleven", "12,twelve"])?;
    fs::write(ws.data_dir().join("notes.txt"), "id,name\n99,ignored\n")?;

    let (state, events) = run_pass(&ws, TrackerState::new());
    assert_eq!(events.len(), 5);
    assert_eq!(state.len(), 2);

    let ids_for = |source: &str| -> Vec<String> {
        events
            .iter()
            .filter(|e| e["source"] == source)
            .map(|e| e["event"]["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(ids_for("a.csv"), vec!["1", "2"]);
    assert_eq!(ids_for("b.csv"), vec!["10", "11", "12"]);
    assert!(ids_for("notes.txt").is_empty());

    Ok(())
}
