use super::*;
use std::sync::Arc;

#[test]
fn run_slot_is_exclusive() {
    let session = Session::new();
    assert!(session.try_start());
    assert!(!session.try_start());
    assert!(session.is_running());
    session.finish();
    assert!(session.try_start());
}

#[test]
fn evaluator_thread_is_tracked() {
    let session = Arc::new(Session::new());
    assert!(!session.on_evaluator_thread());
    let previous = session.enter_evaluator();
    assert!(session.on_evaluator_thread());

    let other = Arc::clone(&session);
    let seen = std::thread::spawn(move || other.on_evaluator_thread()).join();
    assert_eq!(seen.ok(), Some(false));

    session.leave_evaluator(previous);
    assert!(!session.on_evaluator_thread());
}

#[test]
fn publish_replaces_snapshot() {
    let session = Session::new();
    session.publish(DebugSnapshot {
        stack: vec![Value::Integer(1)],
        ..DebugSnapshot::default()
    });
    assert_eq!(session.published().stack, vec![Value::Integer(1)]);
}
