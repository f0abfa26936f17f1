//! State shared between a runtime, its evaluation thread and callers on
//! other threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

use atom_ir::{Callback, Value};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::debug_gate::DebugGate;
use crate::{DebugSnapshot, EvalError};

/// A callback invocation waiting for the evaluation thread.
pub(crate) struct PendingCallback {
    pub(crate) callback: Callback,
    pub(crate) args: Vec<Value>,
    pub(crate) reply: Sender<Result<Option<Value>, EvalError>>,
}

pub(crate) struct Session {
    pub(crate) gate: DebugGate,
    published: Mutex<DebugSnapshot>,
    request_tx: Sender<PendingCallback>,
    request_rx: Receiver<PendingCallback>,
    running: AtomicBool,
    evaluator: Mutex<Option<ThreadId>>,
}

impl Session {
    pub(crate) fn new() -> Self {
        let (request_tx, request_rx) = channel::unbounded();
        Session {
            gate: DebugGate::new(),
            published: Mutex::new(DebugSnapshot::default()),
            request_tx,
            request_rx,
            running: AtomicBool::new(false),
            evaluator: Mutex::new(None),
        }
    }

    pub(crate) fn publish(&self, snapshot: DebugSnapshot) {
        *self.published.lock() = snapshot;
    }

    pub(crate) fn published(&self) -> DebugSnapshot {
        self.published.lock().clone()
    }

    pub(crate) fn request_sender(&self) -> Sender<PendingCallback> {
        self.request_tx.clone()
    }

    pub(crate) fn requests(&self) -> &Receiver<PendingCallback> {
        &self.request_rx
    }

    /// Claim the run slot; `false` when a run is already active.
    pub(crate) fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Record the calling thread as the one evaluating, or clear it.
    pub(crate) fn enter_evaluator(&self) -> Option<ThreadId> {
        self.evaluator.lock().replace(thread::current().id())
    }

    pub(crate) fn leave_evaluator(&self, previous: Option<ThreadId>) {
        *self.evaluator.lock() = previous;
    }

    pub(crate) fn on_evaluator_thread(&self) -> bool {
        *self.evaluator.lock() == Some(thread::current().id())
    }
}

#[cfg(test)]
mod tests;
