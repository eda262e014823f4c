// src/events.rs

//! Event multiplexer: delivers output chunks and exit notifications to the
//! host environment's subscriber.
//!
//! This is deliberately not a general pub/sub bus: there is at most one
//! active handler of each kind (a single UI consumer), and registering a new
//! one replaces the previous. Subscriptions carry a generation counter so a
//! stale unsubscribe can never clear a newer handler, and emission never
//! holds the slot lock while invoking a handler, so unsubscribing from
//! within a handler is safe.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::types::RunId;

/// One chunk of subprocess output. Stderr lines arrive with an `ERR: `
/// prefix so the merged stream stays visually distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    pub run_id: RunId,
    pub data: String,
}

/// The run has terminated, for any reason. Delivered strictly after every
/// output event already produced for the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitEvent {
    pub run_id: RunId,
}

type OutputHandler = Arc<dyn Fn(OutputEvent) + Send + Sync>;
type ExitHandler = Arc<dyn Fn(ExitEvent) + Send + Sync>;

struct Slot<T> {
    handler: Option<T>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            handler: None,
            generation: 0,
        }
    }
}

pub struct Multiplexer {
    output: Arc<Mutex<Slot<OutputHandler>>>,
    exit: Arc<Mutex<Slot<ExitHandler>>>,
}

impl fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multiplexer").finish_non_exhaustive()
    }
}

impl Multiplexer {
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Slot::default())),
            exit: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Register the output handler, replacing any previous one.
    pub fn subscribe_output(
        &self,
        handler: impl Fn(OutputEvent) + Send + Sync + 'static,
    ) -> Subscription {
        install(&self.output, Arc::new(handler))
    }

    /// Register the exit handler, replacing any previous one.
    pub fn subscribe_exit(
        &self,
        handler: impl Fn(ExitEvent) + Send + Sync + 'static,
    ) -> Subscription {
        install(&self.exit, Arc::new(handler))
    }

    pub fn emit_output(&self, event: OutputEvent) {
        let handler = self
            .output
            .lock()
            .ok()
            .and_then(|slot| slot.handler.clone());
        if let Some(handler) = handler {
            handler(event);
        }
    }

    pub fn emit_exit(&self, event: ExitEvent) {
        let handler = self.exit.lock().ok().and_then(|slot| slot.handler.clone());
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new()
    }
}

fn install<T: Send + 'static>(slot: &Arc<Mutex<Slot<T>>>, handler: T) -> Subscription {
    let Ok(mut guard) = slot.lock() else {
        return Subscription {
            slot: None,
            generation: 0,
        };
    };
    guard.generation += 1;
    guard.handler = Some(handler);
    let erased: Arc<dyn ClearSlot> = slot.clone();
    Subscription {
        slot: Some(erased),
        generation: guard.generation,
    }
}

trait ClearSlot: Send + Sync {
    fn clear_if_generation(&self, generation: u64);
}

impl<T: Send + 'static> ClearSlot for Mutex<Slot<T>> {
    fn clear_if_generation(&self, generation: u64) {
        let Ok(mut slot) = self.lock() else {
            return;
        };
        if slot.generation == generation {
            slot.handler = None;
        }
    }
}

/// Handle returned by the subscribe methods.
///
/// `unsubscribe` only clears the handler it registered: if a newer handler
/// has replaced it in the meantime, the call is a no-op. Calling it more
/// than once is fine.
pub struct Subscription {
    slot: Option<Arc<dyn ClearSlot>>,
    generation: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(slot) = &self.slot {
            slot.clear_if_generation(self.generation);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
