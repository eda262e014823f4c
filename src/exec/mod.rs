// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`spawner`] turns a prepared command into a live child process through
//!   the platform shell; the [`Spawner`] trait is the seam that the
//!   supervisor uses in production and that tests replace with fakes.
//! - [`kill`] terminates whole process trees. The launched command runs
//!   through an intermediary shell that spawns the package manager and its
//!   child script, so a plain single-process signal is not enough; the
//!   platform-specific implementation is selected once at startup.

pub mod kill;
pub mod spawner;

pub use kill::{ProcessTerminator, platform_terminator};
pub use spawner::{PreparedCommand, ShellSpawner, Spawner, shell_command};
