// src/exec/spawner.rs

//! Spawning of run subprocesses through the platform shell.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

/// Everything the spawner needs to launch one run: the shell command string,
/// the working directory, and the environment overrides to apply on top of
/// the inherited environment.
#[derive(Debug, Clone)]
pub struct PreparedCommand {
    pub command_line: String,
    pub working_dir: PathBuf,
    pub env_overrides: Vec<(OsString, OsString)>,
}

/// Trait abstracting how prepared commands become child processes.
///
/// Production code uses [`ShellSpawner`]; tests can provide their own
/// implementation that substitutes a harmless script or fails to spawn.
pub trait Spawner: Send + Sync + 'static {
    fn spawn(&self, prepared: &PreparedCommand) -> io::Result<Child>;
}

/// Build the platform shell invocation for a command string: `cmd /C` on
/// Windows, `sh -c` elsewhere, with piped stdio, kill-on-drop, and (on Unix)
/// a fresh process group so the whole tree can be signalled at once.
pub fn shell_command(command_line: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}

/// Real spawner used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellSpawner;

impl Spawner for ShellSpawner {
    fn spawn(&self, prepared: &PreparedCommand) -> io::Result<Child> {
        let mut cmd = shell_command(&prepared.command_line);
        cmd.current_dir(&prepared.working_dir);
        for (key, value) in &prepared.env_overrides {
            cmd.env(key, value);
        }
        cmd.spawn()
    }
}
