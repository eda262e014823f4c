// src/supervisor/mod.rs

//! Run supervision: the table of live runs and the event loop that owns it.
//!
//! The [`Supervisor`] is an owned, explicitly constructed value — its run
//! table and subscriber slots are instance fields, not process-wide state.
//! One Tokio task drives its event loop; everything that touches the table
//! (starts, stops, exit notifications, shutdown) arrives as a [`Control`]
//! message on a single channel, so bookkeeping is effectively
//! single-threaded while the subprocesses themselves run fully in parallel.
//!
//! - [`table`] holds the pure bookkeeping (insert-once / remove-once
//!   semantics), unit-testable without Tokio.
//! - [`runtime`] is the async shell: the event loop plus the cloneable
//!   [`SupervisorHandle`] callers use.
//! - [`pump`] streams one run's stdout/stderr into the log sink and the
//!   event multiplexer, then reports the exit.

use tokio::sync::oneshot;

use crate::errors::Result;
use crate::types::{RunId, RunRequest};

/// Control messages consumed by the supervisor event loop.
#[derive(Debug)]
pub(crate) enum Control {
    Start {
        request: RunRequest,
        reply: oneshot::Sender<Result<()>>,
    },
    Stop {
        run_id: RunId,
    },
    RunExited {
        run_id: RunId,
    },
    List {
        reply: oneshot::Sender<Vec<RunId>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

mod pump;
pub mod runtime;
pub mod table;

pub use runtime::{Supervisor, SupervisorHandle};
pub use table::{RunTable, RunningProcess};
