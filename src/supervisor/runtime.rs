// src/supervisor/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::errors::{Result, RunnerError};
use crate::events::{ExitEvent, Multiplexer, OutputEvent};
use crate::exec::{
    PreparedCommand, ProcessTerminator, ShellSpawner, Spawner, platform_terminator,
};
use crate::paths;
use crate::sink::{LogSink, MAX_LOG_LINES};
use crate::supervisor::table::{RunTable, RunningProcess};
use crate::types::{self, RunId, RunRequest};

use super::{Control, pump};

/// Owns the run table and reacts to control messages and subprocess exits.
///
/// Constructed once per application lifetime via [`Supervisor::spawn`] and
/// torn down explicitly through [`SupervisorHandle::shutdown`], which
/// terminates every still-tracked run before the table is discarded.
pub struct Supervisor<S: Spawner> {
    table: RunTable,
    spawner: S,
    terminator: Box<dyn ProcessTerminator>,
    events: Arc<Multiplexer>,
    log_root: PathBuf,
    log_capacity: usize,
    control_tx: mpsc::Sender<Control>,
    control_rx: mpsc::Receiver<Control>,
}

impl<S: Spawner> fmt::Debug for Supervisor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("table", &self.table)
            .field("log_root", &self.log_root)
            .finish_non_exhaustive()
    }
}

impl Supervisor<ShellSpawner> {
    /// Construct a production supervisor and spawn its event loop.
    pub fn spawn(log_root: impl Into<PathBuf>) -> SupervisorHandle {
        Self::spawn_with(ShellSpawner, log_root, MAX_LOG_LINES)
    }
}

impl<S: Spawner> Supervisor<S> {
    /// Construct a supervisor with an explicit spawner and log retention,
    /// and spawn its event loop. This is the seam integration tests use.
    pub fn spawn_with(
        spawner: S,
        log_root: impl Into<PathBuf>,
        log_capacity: usize,
    ) -> SupervisorHandle {
        let (control_tx, control_rx) = mpsc::channel(64);
        let events = Arc::new(Multiplexer::new());

        let supervisor = Self {
            table: RunTable::new(),
            spawner,
            terminator: platform_terminator(),
            events: Arc::clone(&events),
            log_root: log_root.into(),
            log_capacity: log_capacity.max(1),
            control_tx: control_tx.clone(),
            control_rx,
        };
        tokio::spawn(supervisor.run());

        SupervisorHandle { control_tx, events }
    }

    /// Main event loop. Ends on [`Control::Shutdown`].
    async fn run(mut self) {
        info!(log_root = %self.log_root.display(), "supervisor started");

        while let Some(message) = self.control_rx.recv().await {
            match message {
                Control::Start { request, reply } => {
                    let result = self.handle_start(request);
                    let _ = reply.send(result);
                }
                Control::Stop { run_id } => {
                    self.handle_stop(&run_id);
                }
                Control::RunExited { run_id } => {
                    if self.table.remove(&run_id).is_some() {
                        debug!(run_id = %run_id, "run removed from table after exit");
                    }
                }
                Control::List { reply } => {
                    let _ = reply.send(self.table.run_ids());
                }
                Control::Shutdown { reply } => {
                    self.handle_shutdown();
                    let _ = reply.send(());
                    break;
                }
            }
        }

        info!("supervisor exiting");
    }

    fn handle_start(&mut self, request: RunRequest) -> Result<()> {
        if self.table.contains(&request.run_id) {
            warn!(run_id = %request.run_id, "rejecting start: run already active");
            return Err(RunnerError::AlreadyRunning(request.run_id));
        }

        // Script names may contain whitespace; quote them for the shell.
        let command_line = format!(
            "{} run \"{}\"",
            request.package_manager.command(),
            request.script_name
        );

        let mut env_overrides = Vec::new();
        if let Some(dir) = paths::resolve_runtime_dir(request.runtime_path.as_deref()) {
            env_overrides.push(paths::prepend_to_search_path(&dir));
        }

        let log_path = paths::log_file_path(
            &self.log_root,
            types::project_of(&request.run_id),
            &request.script_name,
        );
        let mut sink = LogSink::with_capacity(&log_path, self.log_capacity);
        sink.append(&format!("Executing: {command_line}"));

        info!(
            run_id = %request.run_id,
            cmd = %command_line,
            cwd = %request.working_dir.display(),
            "starting run"
        );

        let prepared = PreparedCommand {
            command_line,
            working_dir: request.working_dir.clone(),
            env_overrides,
        };

        let child = match self.spawner.spawn(&prepared) {
            Ok(child) => child,
            Err(err) => {
                warn!(run_id = %request.run_id, error = %err, "failed to spawn run");
                let message = format!("Failed to start: {err}");
                sink.append(&message);
                sink.close();
                self.events.emit_output(OutputEvent {
                    run_id: request.run_id.clone(),
                    data: message,
                });
                self.events.emit_exit(ExitEvent {
                    run_id: request.run_id.clone(),
                });
                return Err(RunnerError::Spawn {
                    run_id: request.run_id,
                    source: err,
                });
            }
        };

        let pid = child.id();
        self.table.try_insert(RunningProcess {
            run_id: request.run_id.clone(),
            pid,
            started_at: Instant::now(),
            log_path,
        })?;

        tokio::spawn(pump::pump_run(
            request.run_id,
            child,
            sink,
            Arc::clone(&self.events),
            self.control_tx.clone(),
        ));

        Ok(())
    }

    /// Stop a run: remove it from the table immediately (so it is
    /// synchronously observable as "not running") and kill its process
    /// tree. Unknown identities are a silent no-op.
    fn handle_stop(&mut self, run_id: &str) {
        let Some(entry) = self.table.remove(run_id) else {
            debug!(run_id = %run_id, "stop requested for unknown run; ignoring");
            return;
        };
        info!(run_id = %run_id, pid = ?entry.pid, "stopping run");
        self.kill_entry(&entry);
    }

    fn kill_entry(&self, entry: &RunningProcess) {
        let Some(pid) = entry.pid else {
            return;
        };
        if let Err(err) = self.terminator.kill_tree(pid) {
            // A kill that races the process's own exit lands here; the end
            // state is identical either way.
            debug!(
                run_id = %entry.run_id,
                pid,
                error = %err,
                "process tree kill reported an error"
            );
        }
    }

    fn handle_shutdown(&mut self) {
        let entries = self.table.drain();
        if !entries.is_empty() {
            info!(count = entries.len(), "terminating remaining runs before shutdown");
        }
        for entry in &entries {
            self.kill_entry(entry);
        }
    }
}

/// Cloneable handle to a running [`Supervisor`].
///
/// All calls are forwarded to the supervisor's event loop; after
/// [`shutdown`](Self::shutdown) they fail with
/// [`RunnerError::SupervisorClosed`].
#[derive(Clone)]
pub struct SupervisorHandle {
    control_tx: mpsc::Sender<Control>,
    events: Arc<Multiplexer>,
}

impl fmt::Debug for SupervisorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorHandle").finish_non_exhaustive()
    }
}

impl SupervisorHandle {
    /// Launch a run. Returns once the subprocess has been spawned (or has
    /// failed to spawn), not once it finishes.
    pub async fn start(&self, request: RunRequest) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.control_tx
            .send(Control::Start {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RunnerError::SupervisorClosed)?;
        reply_rx.await.map_err(|_| RunnerError::SupervisorClosed)?
    }

    /// Request termination of a run. Fire-and-forget: stopping an unknown
    /// or already-finished run is not an error, and no confirmation of the
    /// OS-level kill is returned.
    pub async fn stop(&self, run_id: impl Into<RunId>) {
        let _ = self
            .control_tx
            .send(Control::Stop {
                run_id: run_id.into(),
            })
            .await;
    }

    /// Snapshot of currently tracked run identities.
    pub async fn running(&self) -> Vec<RunId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .control_tx
            .send(Control::List { reply: reply_tx })
            .await
            .is_err()
        {
            return Vec::new();
        }
        reply_rx.await.unwrap_or_default()
    }

    /// Terminate every tracked run (best-effort) and stop the supervisor.
    pub async fn shutdown(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .control_tx
            .send(Control::Shutdown { reply: reply_tx })
            .await
            .is_err()
        {
            return;
        }
        let _ = reply_rx.await;
    }

    /// The event multiplexer for this supervisor's runs.
    pub fn events(&self) -> &Multiplexer {
        &self.events
    }
}
