//! Atom Eval - evaluator, host bridge and debugger runtime for Atom.
//!
//! # Architecture
//!
//! - [`Interpreter`]: walks parsed [`Items`](atom_ir::Items), resolving
//!   symbols through put-bindings and set-bindings, with the built-in words
//!   and late-bound operators
//! - [`host`]: the reflective host bridge, the registry host modules are
//!   described with, and the standard `core` module
//! - [`Runtime`]: an interpreter behind a mutex, evaluated on its own
//!   thread, with the debug gate and the [`Observer`] notifications go to
//!
//! Enable logging with [`init_tracing`] and `RUST_LOG=atom_eval=debug`.

mod bindings;
mod debug_gate;
mod dispatch;
mod errors;
mod frames;
pub mod host;
mod interpreter;
pub mod operators;
mod runtime;
mod session;
mod snapshot;
mod stack;

pub use bindings::{Scope, ScopedBindings};
pub use dispatch::{DispatchMode, Observer, OutputChannel, RuntimeEvent};
pub use errors::{BindingError, EvalError, HostError, RuntimeError};
pub use frames::{CallEnvironment, CallEnvironmentStack};
pub use interpreter::{Interpreter, PutScope};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, DEFAULT_MAX_CALL_DEPTH};
pub use snapshot::{DebugSnapshot, FrameSnapshot};
pub use stack::OperandStack;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let layer = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            // Another subscriber may already be installed by the host program.
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(layer)
                .try_init();
        }
    });
}
