//! Debugger snapshots.
//!
//! A snapshot is a detached copy of interpreter state. The evaluator
//! publishes one before every pause and at the end of each run; the
//! observer reads the published copy while evaluation is in progress.

use atom_ir::{Items, Symbol, Value};

/// Interpreter state as seen by the debugger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugSnapshot {
    /// Operand stack, bottom to top.
    pub stack: Vec<Value>,
    /// Call environments, innermost first.
    pub frames: Vec<FrameSnapshot>,
    /// Parsed program of the current run.
    pub root: Items,
    pub running: bool,
    pub paused: bool,
}

impl DebugSnapshot {
    /// The element the innermost frame is processing.
    pub fn cursor(&self) -> Option<&Value> {
        self.frames.first().and_then(|frame| frame.cursor.as_ref())
    }
}

/// One call environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    pub items: Items,
    pub cursor: Option<Value>,
    /// Put-bindings of the scope active when the frame was entered, sorted
    /// by name.
    pub put_bindings: Vec<(Symbol, Value)>,
}
