use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn resume_without_pause_records_step() {
    let gate = DebugGate::new();
    assert!(!gate.resume(true));
    assert!(!gate.is_paused());
    assert!(gate.take_step());
    assert!(!gate.take_step());
}

#[test]
fn failed_announce_does_not_block() {
    let gate = DebugGate::new();
    gate.pause(|| false);
    assert!(!gate.is_paused());
}

#[test]
fn resume_inside_announce_does_not_block() {
    let gate = DebugGate::new();
    gate.pause(|| {
        assert!(gate.resume(false));
        true
    });
    assert!(!gate.is_paused());
}

#[test]
fn pause_blocks_until_resumed() {
    let gate = Arc::new(DebugGate::new());
    let released = Arc::new(AtomicBool::new(false));

    let worker = {
        let gate = Arc::clone(&gate);
        let released = Arc::clone(&released);
        thread::spawn(move || {
            gate.pause(|| true);
            released.store(true, Ordering::SeqCst);
        })
    };

    while !gate.is_paused() {
        thread::sleep(Duration::from_millis(1));
    }
    thread::sleep(Duration::from_millis(20));
    assert!(!released.load(Ordering::SeqCst));

    assert!(gate.resume(true));
    assert!(worker.join().is_ok());
    assert!(released.load(Ordering::SeqCst));
    assert!(gate.take_step());
}

#[test]
fn reset_clears_flags() {
    let gate = DebugGate::new();
    gate.resume(true);
    gate.reset();
    assert!(!gate.take_step());
}
