use std::io;
use std::sync::{Arc, Mutex};

use noderun::exec::{PreparedCommand, Spawner, shell_command};
use tokio::process::Child;

/// A fake spawner that:
/// - records every `PreparedCommand` it is asked to spawn
/// - runs a fixed substitute shell script instead of the real package manager
/// - can simulate spawn failure.
pub struct FakeSpawner {
    substitute: String,
    fail_spawn: bool,
    recorded: Arc<Mutex<Vec<PreparedCommand>>>,
}

impl FakeSpawner {
    /// Spawn `substitute` (through the platform shell) for every request.
    pub fn new(substitute: impl Into<String>) -> Self {
        Self {
            substitute: substitute.into(),
            fail_spawn: false,
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every spawn with a not-found error.
    pub fn failing() -> Self {
        Self {
            substitute: String::new(),
            fail_spawn: true,
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of the commands this spawner has been asked to run.
    pub fn recorded(&self) -> Arc<Mutex<Vec<PreparedCommand>>> {
        Arc::clone(&self.recorded)
    }
}

impl Spawner for FakeSpawner {
    fn spawn(&self, prepared: &PreparedCommand) -> io::Result<Child> {
        if let Ok(mut guard) = self.recorded.lock() {
            guard.push(prepared.clone());
        }
        if self.fail_spawn {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no such package manager binary",
            ));
        }
        shell_command(&self.substitute).spawn()
    }
}
