// tests/log_sink.rs

use std::fs;

use noderun::sink::LogSink;
use tempfile::TempDir;

fn file_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("log file should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn keeps_every_line_under_capacity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.log");

    let mut sink = LogSink::with_capacity(&path, 10);
    for i in 0..5 {
        sink.append(&format!("line {i}"));
    }
    sink.close();

    assert_eq!(
        file_lines(&path),
        vec!["line 0", "line 1", "line 2", "line 3", "line 4"]
    );
}

#[test]
fn capacity_plus_one_drops_only_the_oldest_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.log");

    let mut sink = LogSink::with_capacity(&path, 5);
    for i in 0..6 {
        sink.append(&format!("line {i}"));
    }
    sink.close();

    assert_eq!(
        file_lines(&path),
        vec!["line 1", "line 2", "line 3", "line 4", "line 5"]
    );
}

#[test]
fn compaction_rewrites_file_from_ring() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.log");

    let mut sink = LogSink::with_capacity(&path, 3);
    for i in 0..3 {
        sink.append(&format!("line {i}"));
    }

    // Three appends hit the compaction threshold; the file now reflects the
    // ring even though the sink is still open.
    assert_eq!(file_lines(&path), vec!["line 0", "line 1", "line 2"]);

    sink.append("line 3");
    sink.close();
    assert_eq!(file_lines(&path), vec!["line 1", "line 2", "line 3"]);
}

#[test]
fn open_truncates_previous_run_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.log");
    fs::write(&path, "stale content from an earlier run\n").unwrap();

    let mut sink = LogSink::with_capacity(&path, 10);
    sink.append("fresh");
    sink.close();

    assert_eq!(file_lines(&path), vec!["fresh"]);
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("run.log");

    let mut sink = LogSink::with_capacity(&path, 10);
    sink.append("hello");
    sink.close();

    assert_eq!(file_lines(&path), vec!["hello"]);
}

#[test]
fn close_is_idempotent_and_freezes_the_sink() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.log");

    let mut sink = LogSink::with_capacity(&path, 10);
    sink.append("one");
    sink.close();
    sink.close();

    // Appends after close are dropped.
    sink.append("two");
    assert_eq!(file_lines(&path), vec!["one"]);
}

#[test]
fn unwritable_path_degrades_to_memory_only() {
    let dir = TempDir::new().unwrap();
    // Parent "directory" is actually a file, so creation must fail.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("run.log");

    let mut sink = LogSink::with_capacity(&path, 10);
    sink.append("still buffered");
    sink.close();

    let lines: Vec<&str> = sink.lines().collect();
    assert_eq!(lines, vec!["still buffered"]);
    assert!(!path.exists());
}
