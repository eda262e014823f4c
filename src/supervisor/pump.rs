// src/supervisor/pump.rs

//! Per-run output pump.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::{ExitEvent, Multiplexer, OutputEvent};
use crate::sink::LogSink;
use crate::supervisor::Control;
use crate::types::RunId;

/// Stream one run to completion: merge its stdout/stderr into a single
/// ordered line stream feeding the log sink and the event multiplexer, wait
/// for the process to exit, close the sink, emit the exit event, and notify
/// the supervisor loop so the table entry is dropped.
///
/// Both readers drain into one channel and the exit event is only emitted
/// after that channel closes, so for any single run every output event is
/// delivered before its exit event.
pub(crate) async fn pump_run(
    run_id: RunId,
    mut child: Child,
    mut sink: LogSink,
    events: Arc<Multiplexer>,
    control_tx: mpsc::Sender<Control>,
) {
    let (line_tx, mut line_rx) = mpsc::channel::<String>(64);

    if let Some(stdout) = child.stdout.take() {
        let tx = line_tx.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let tx = line_tx.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(format!("ERR: {line}")).await.is_err() {
                    break;
                }
            }
        });
    }
    drop(line_tx);

    while let Some(line) = line_rx.recv().await {
        sink.append(&line);
        events.emit_output(OutputEvent {
            run_id: run_id.clone(),
            data: line,
        });
    }

    match child.wait().await {
        Ok(status) => {
            info!(
                run_id = %run_id,
                exit_code = status.code().unwrap_or(-1),
                success = status.success(),
                "run exited"
            );
        }
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "failed to wait for run process");
        }
    }

    sink.close();
    events.emit_exit(ExitEvent {
        run_id: run_id.clone(),
    });

    if control_tx.send(Control::RunExited { run_id }).await.is_err() {
        debug!("supervisor gone before exit notification; nothing to clean up");
    }
}
