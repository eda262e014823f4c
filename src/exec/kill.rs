// src/exec/kill.rs

//! Whole-process-tree termination.
//!
//! Termination is immediate and forceful: the cancellation model has no
//! graceful-then-forceful escalation, and a stop is fire-and-forget from
//! the caller's perspective.

use std::io;

/// Terminate a subprocess together with all of its descendants.
pub trait ProcessTerminator: Send + Sync {
    fn kill_tree(&self, pid: u32) -> io::Result<()>;
}

/// Unix: SIGKILL to the process group. Children are spawned with
/// `process_group(0)`, so the group id equals the shell's pid and the
/// signal reaches the package manager and its script process as well.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGroupTerminator;

#[cfg(unix)]
impl ProcessTerminator for ProcessGroupTerminator {
    fn kill_tree(&self, pid: u32) -> io::Result<()> {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        killpg(Pid::from_raw(pid as i32), Signal::SIGKILL)
            .map_err(|errno| io::Error::from_raw_os_error(errno as i32))
    }
}

/// Windows: `taskkill /PID <pid> /T /F` kills the tree rooted at the shell.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskkillTerminator;

#[cfg(windows)]
impl ProcessTerminator for TaskkillTerminator {
    fn kill_tree(&self, pid: u32) -> io::Result<()> {
        std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|_| ())
    }
}

#[cfg(not(any(unix, windows)))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTerminator;

#[cfg(not(any(unix, windows)))]
impl ProcessTerminator for NoopTerminator {
    fn kill_tree(&self, _pid: u32) -> io::Result<()> {
        Ok(())
    }
}

/// Select the terminator for the current platform.
pub fn platform_terminator() -> Box<dyn ProcessTerminator> {
    #[cfg(unix)]
    {
        Box::new(ProcessGroupTerminator)
    }
    #[cfg(windows)]
    {
        Box::new(TaskkillTerminator)
    }
    #[cfg(not(any(unix, windows)))]
    {
        Box::new(NoopTerminator)
    }
}
