// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::RunId;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("run '{0}' is already running")]
    AlreadyRunning(RunId),

    #[error("failed to spawn process for run '{run_id}': {source}")]
    Spawn {
        run_id: RunId,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("project error: {0}")]
    Project(String),

    #[error("supervisor is no longer running")]
    SupervisorClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunnerError>;
