// tests/run_table.rs

use std::path::PathBuf;
use std::time::Instant;

use noderun::errors::RunnerError;
use noderun::supervisor::{RunTable, RunningProcess};

fn process(run_id: &str) -> RunningProcess {
    RunningProcess {
        run_id: run_id.to_string(),
        pid: Some(4242),
        started_at: Instant::now(),
        log_path: PathBuf::from("p_build.log"),
    }
}

#[test]
fn duplicate_insert_fails_and_keeps_the_existing_entry() {
    let mut table = RunTable::new();
    table.try_insert(process("p1:build")).unwrap();

    let err = table.try_insert(process("p1:build")).unwrap_err();
    assert!(matches!(err, RunnerError::AlreadyRunning(id) if id == "p1:build"));
    assert_eq!(table.len(), 1);
}

#[test]
fn removal_happens_exactly_once() {
    let mut table = RunTable::new();
    table.try_insert(process("p1:build")).unwrap();

    assert!(table.remove("p1:build").is_some());
    assert!(table.remove("p1:build").is_none());
    assert!(table.is_empty());
}

#[test]
fn same_project_different_scripts_do_not_collide() {
    let mut table = RunTable::new();
    table.try_insert(process("p1:build")).unwrap();
    table.try_insert(process("p1:test")).unwrap();

    assert_eq!(table.run_ids(), vec!["p1:build", "p1:test"]);
}

#[test]
fn drain_empties_the_table() {
    let mut table = RunTable::new();
    table.try_insert(process("p1:build")).unwrap();
    table.try_insert(process("p2:dev")).unwrap();

    let drained = table.drain();
    assert_eq!(drained.len(), 2);
    assert!(table.is_empty());
}
