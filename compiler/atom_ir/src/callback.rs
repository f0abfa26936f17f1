//! Native callbacks: quoted Atom code handed to host APIs.
//!
//! A callback does not own an interpreter. It holds a weak [`CallbackPort`]
//! back to the runtime that created it; invoking the callback asks the port to
//! push the arguments, evaluate the body and pop the result. When the runtime
//! is gone the callback is detached and every call fails.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::{HostType, Items, Value};

/// Parameter and return types of a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<HostType>,
    /// `None` for callbacks that return nothing.
    pub returns: Option<HostType>,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Errors raised when calling back into interpreted code.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CallbackError {
    #[error("callback runtime has been dropped")]
    Detached,
    #[error("callback invoked while the runtime is paused")]
    Paused,
    #[error("callback invoked from the evaluation thread outside a host call")]
    Reentrant,
    #[error("callback expects {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("callback failed: {0}")]
    Failed(String),
}

/// The runtime side of a callback.
pub trait CallbackPort: Send + Sync {
    fn call(&self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, CallbackError>;
}

struct CallbackInner {
    body: Items,
    signature: Signature,
    port: Weak<dyn CallbackPort>,
}

/// A host-callable handle wrapping an interpreted body.
#[derive(Clone)]
pub struct Callback(Arc<CallbackInner>);

impl Callback {
    pub fn new(body: Items, signature: Signature, port: Weak<dyn CallbackPort>) -> Self {
        Callback(Arc::new(CallbackInner {
            body,
            signature,
            port,
        }))
    }

    pub fn body(&self) -> &Items {
        &self.0.body
    }

    pub fn signature(&self) -> &Signature {
        &self.0.signature
    }

    /// Invoke from host code on any thread.
    ///
    /// Host code that runs inside a marshaled host call should go through
    /// the call's callback context instead; this entry point is for handlers
    /// stored and fired later.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Option<Value>, CallbackError> {
        let expected = self.0.signature.arity();
        if args.len() != expected {
            return Err(CallbackError::Arity {
                expected,
                got: args.len(),
            });
        }
        let port = self.0.port.upgrade().ok_or(CallbackError::Detached)?;
        port.call(self, args)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback{}", self.0.body)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("body", &self.0.body)
            .field("signature", &self.0.signature)
            .finish_non_exhaustive()
    }
}
