//! Breakpoint gate between the evaluation thread and the observer.
//!
//! The evaluator parks itself in [`DebugGate::pause`]; any other thread
//! releases it with [`DebugGate::resume`]. The step flag armed by `resume`
//! makes the evaluator pause again before the next element it processes.

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    step_next: bool,
}

#[derive(Debug, Default)]
pub(crate) struct DebugGate {
    state: Mutex<GateState>,
    resumed: Condvar,
}

impl DebugGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark the gate paused, run `announce`, then block until resumed.
    ///
    /// `announce` runs without the gate lock held so the observer can call
    /// [`resume`](Self::resume) while handling the notification. When it
    /// returns `false` nobody can resume the gate and the pause is dropped.
    pub(crate) fn pause(&self, announce: impl FnOnce() -> bool) {
        self.state.lock().paused = true;
        if !announce() {
            self.state.lock().paused = false;
            return;
        }
        let mut state = self.state.lock();
        while state.paused {
            self.resumed.wait(&mut state);
        }
    }

    /// Release a paused evaluator, arming the step flag when `step_next`.
    ///
    /// Returns whether the gate was paused. When it was not, only the step
    /// flag is recorded.
    pub(crate) fn resume(&self, step_next: bool) -> bool {
        let mut state = self.state.lock();
        state.step_next = step_next;
        let was_paused = std::mem::replace(&mut state.paused, false);
        drop(state);
        if was_paused {
            self.resumed.notify_all();
        }
        was_paused
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Consume the step flag.
    pub(crate) fn take_step(&self) -> bool {
        std::mem::take(&mut self.state.lock().step_next)
    }

    pub(crate) fn reset(&self) {
        let mut state = self.state.lock();
        state.paused = false;
        state.step_next = false;
    }
}

#[cfg(test)]
mod tests;
