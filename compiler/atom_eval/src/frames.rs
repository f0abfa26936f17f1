//! Call environments: the evaluator's live frames.
//!
//! One [`CallEnvironment`] is pushed per list being evaluated and popped when
//! the list finishes. The debugger reads them innermost first to show where
//! evaluation is. Frames are left in place when an error unwinds so the
//! failing location stays visible until the next run resets the stack.

use atom_ir::{Items, Value};

use crate::EvalError;

/// A list under evaluation.
#[derive(Clone, Debug)]
pub struct CallEnvironment {
    pub items: Items,
    /// The element being processed; `None` before the first one.
    pub cursor: Option<Value>,
    /// Index of the innermost put-scope when the frame was entered.
    pub put_scope: usize,
}

/// Frame stack with an optional depth limit.
#[derive(Clone, Debug, Default)]
pub struct CallEnvironmentStack {
    frames: Vec<CallEnvironment>,
    max_depth: Option<usize>,
}

impl CallEnvironmentStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        CallEnvironmentStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing with `RecursionLimit` at the depth limit.
    pub fn push(&mut self, items: Items, put_scope: usize) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(EvalError::RecursionLimit(max));
            }
        }
        self.frames.push(CallEnvironment {
            items,
            cursor: None,
            put_scope,
        });
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallEnvironmentStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    /// Record the element about to be processed by the innermost frame.
    pub fn set_cursor(&mut self, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.cursor = Some(value);
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop frames above `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn current(&self) -> Option<&CallEnvironment> {
        self.frames.last()
    }

    pub fn innermost_first(&self) -> impl Iterator<Item = &CallEnvironment> {
        self.frames.iter().rev()
    }
}

#[cfg(test)]
mod tests;
