//! Error types for evaluation, host interop and the runtime.
//!
//! Nothing here is retried. An error escaping the outermost evaluation ends
//! the run and is delivered to the observer in
//! [`RuntimeEvent::Terminating`](crate::RuntimeEvent::Terminating).

use atom_ir::{CallbackError, OperatorKind, Symbol, Value};
use atom_lexer::LexError;

/// Failure of a [`ScopedBindings`](crate::ScopedBindings) operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("'{0}' is already bound in this scope")]
    Duplicate(Symbol),
}

/// Failure reported by a host bridge.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("module '{0}' is not registered")]
    UnknownModule(String),
    #[error("type '{name}' not found in module '{module}'")]
    UnknownType { module: String, name: String },
    #[error("'{ty}' has no member '{member}'")]
    MissingMember { ty: String, member: String },
    #[error("'{ty}.{member}' has no overload taking {argc} arguments")]
    NoOverload {
        ty: String,
        member: String,
        argc: usize,
    },
    #[error("instance member '{member}' needs a target")]
    MissingTarget { member: String },
    #[error("argument {index}: expected {expected}, found {found}")]
    Argument {
        index: usize,
        expected: &'static str,
        found: String,
    },
    #[error("cannot convert '{value}' to {target}")]
    Conversion { value: String, target: String },
    #[error("{0}")]
    Failed(String),
    /// Interpreted code called back from host code failed.
    #[error(transparent)]
    Eval(Box<EvalError>),
}

impl From<EvalError> for HostError {
    fn from(error: EvalError) -> Self {
        HostError::Eval(Box::new(error))
    }
}

/// Evaluation failure.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("'{0}' is not bound")]
    Unbound(Symbol),
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("operator '{op}' is not defined for {operands}")]
    OperandTypes { op: OperatorKind, operands: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    Overflow(OperatorKind),
    #[error("call depth exceeds {0}")]
    RecursionLimit(usize),
    /// A host member call or import failed; `signature` names the call.
    #[error("Cannot execute '{signature}': {cause}")]
    Host {
        signature: String,
        #[source]
        cause: HostError,
    },
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Callback(#[from] CallbackError),
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}

impl EvalError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        EvalError::TypeMismatch {
            expected,
            found: found.describe(),
        }
    }

    /// The innermost evaluation error, looking through host-call wrappers.
    ///
    /// A callback that fails inside a host call surfaces as
    /// `Host { cause: HostError::Eval(..) }`; this returns the callback's own
    /// error. Host failures that did not come from interpreted code are their
    /// own root cause.
    pub fn root_cause(&self) -> &EvalError {
        let mut current = self;
        while let EvalError::Host {
            cause: HostError::Eval(inner),
            ..
        } = current
        {
            current = inner;
        }
        current
    }
}

/// Failure to start or drive a run.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("a run is already in progress")]
    AlreadyRunning,
    #[error("cannot start the evaluation thread: {0}")]
    Spawn(String),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[cfg(test)]
mod tests;
