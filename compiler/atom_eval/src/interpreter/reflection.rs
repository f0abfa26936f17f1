//! The `runtime` object: a program reading its own interpreter.
//!
//! Its members need the live interpreter, so they are answered on the
//! evaluation thread and never go through the host bridge.

use std::any::Any;

use atom_ir::{HostData, HostHandle, HostType, Items, Symbol, Value};

use super::Interpreter;
use crate::host::{builtin_type, call_signature, object};
use crate::runtime::read_code;
use crate::{EvalError, HostError};

const TYPE_NAME: &str = "Runtime";

const MEMBERS: [&str; 5] = ["Stack", "CallDepth", "CallEnvironments", "CurrentRootItems", "Code"];

#[derive(Debug)]
struct RuntimeObject;

impl HostData for RuntimeObject {
    fn render(&self) -> String {
        "runtime".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn runtime_type() -> HostType {
    builtin_type(TYPE_NAME)
}

impl Interpreter {
    /// Bind `runtime`, `Runtime` and the member words not already bound.
    pub(super) fn register_runtime(&mut self) {
        self.set_bindings
            .set(Symbol::new("runtime"), object(runtime_type(), RuntimeObject));
        self.set_bindings
            .set(Symbol::new(TYPE_NAME), Value::host_type(runtime_type()));
        for member in MEMBERS {
            if !self.set_bindings.contains(member) {
                self.set_bindings.set(
                    Symbol::new(member),
                    Value::list(vec![Value::string(member), Value::symbol("execute")]),
                );
            }
        }
    }

    /// Answer a member of the `runtime` object.
    pub(super) fn reflect(&self, member: &str, args: &[Value]) -> Result<Value, EvalError> {
        match (member, args) {
            ("Stack", []) => Ok(Value::list(self.stack.as_slice().to_vec())),
            ("CallDepth", []) => Ok(Value::Integer(
                i64::try_from(self.frames.depth()).unwrap_or(i64::MAX),
            )),
            ("CallEnvironments", []) => Ok(Value::List(
                self.frames
                    .innermost_first()
                    .map(|frame| Value::List(frame.items.clone()))
                    .collect::<Items>(),
            )),
            ("CurrentRootItems", []) => Ok(Value::List(self.root.clone())),
            ("Code", [code_or_path]) => {
                read_code(&self.base_dir, &code_or_path.to_text()).map(Value::string)
            }
            _ => Err(EvalError::Host {
                signature: call_signature(TYPE_NAME, member, args),
                cause: HostError::MissingMember {
                    ty: TYPE_NAME.to_string(),
                    member: member.to_string(),
                },
            }),
        }
    }
}

/// Whether `subject` is the `runtime` object or its type.
pub(super) fn is_runtime(subject: &Value) -> bool {
    match subject {
        Value::Host(HostHandle::Object(host)) => host.downcast_ref::<RuntimeObject>().is_some(),
        Value::Host(HostHandle::Type(ty)) => *ty == runtime_type(),
        _ => false,
    }
}
