// tests/events.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use noderun::events::{ExitEvent, Multiplexer, OutputEvent, Subscription};

fn output(run_id: &str, data: &str) -> OutputEvent {
    OutputEvent {
        run_id: run_id.to_string(),
        data: data.to_string(),
    }
}

#[test]
fn delivers_output_to_the_registered_handler() {
    let mux = Multiplexer::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen2 = Arc::clone(&seen);
    let _sub = mux.subscribe_output(move |event| {
        seen2.lock().unwrap().push(event.data);
    });

    mux.emit_output(output("p1:build", "hello"));
    mux.emit_output(output("p1:build", "world"));

    assert_eq!(*seen.lock().unwrap(), vec!["hello", "world"]);
}

#[test]
fn emitting_without_a_handler_is_a_no_op() {
    let mux = Multiplexer::new();
    mux.emit_output(output("p1:build", "dropped"));
    mux.emit_exit(ExitEvent {
        run_id: "p1:build".to_string(),
    });
}

#[test]
fn a_new_handler_replaces_the_previous_one() {
    let mux = Multiplexer::new();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let first2 = Arc::clone(&first);
    let _old = mux.subscribe_output(move |_| {
        first2.fetch_add(1, Ordering::SeqCst);
    });
    let second2 = Arc::clone(&second);
    let _new = mux.subscribe_output(move |_| {
        second2.fetch_add(1, Ordering::SeqCst);
    });

    mux.emit_output(output("p1:build", "x"));

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribe_is_idempotent() {
    let mux = Multiplexer::new();
    let count = Arc::new(AtomicUsize::new(0));

    let count2 = Arc::clone(&count);
    let sub = mux.subscribe_output(move |_| {
        count2.fetch_add(1, Ordering::SeqCst);
    });

    sub.unsubscribe();
    sub.unsubscribe();
    mux.emit_output(output("p1:build", "x"));

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn stale_unsubscribe_does_not_clear_the_replacement() {
    let mux = Multiplexer::new();
    let count = Arc::new(AtomicUsize::new(0));

    let stale = mux.subscribe_output(|_| {});
    let count2 = Arc::clone(&count);
    let _current = mux.subscribe_output(move |_| {
        count2.fetch_add(1, Ordering::SeqCst);
    });

    stale.unsubscribe();
    mux.emit_output(output("p1:build", "x"));

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribing_from_within_the_handler_is_safe() {
    let mux = Multiplexer::new();
    let count = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let count2 = Arc::clone(&count);
    let slot2 = Arc::clone(&slot);
    let sub = mux.subscribe_output(move |_| {
        count2.fetch_add(1, Ordering::SeqCst);
        if let Some(sub) = slot2.lock().unwrap().as_ref() {
            sub.unsubscribe();
        }
    });
    *slot.lock().unwrap() = Some(sub);

    // First emission runs the handler (which unsubscribes itself); the
    // second finds no handler.
    mux.emit_output(output("p1:build", "x"));
    mux.emit_output(output("p1:build", "y"));

    assert_eq!(count.load(Ordering::SeqCst), 1);
}
