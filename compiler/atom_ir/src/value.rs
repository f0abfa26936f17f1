//! Runtime values.
//!
//! Every variant is cheap to clone: scalars are inline, strings and lists are
//! reference counted, host objects and callbacks are handles. All values are
//! `Send + Sync` so snapshots can be published to the observer thread.

use std::fmt;
use std::sync::Arc;

use crate::{Callback, HostHandle, HostObject, HostType, Items, NativeAction, Symbol};

/// A value on the operand stack, in a binding, or in parsed code.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Arc<str>),
    Symbol(Symbol),
    List(Items),
    Action(NativeAction),
    Host(HostHandle),
    Callback(Callback),
}

impl Value {
    pub fn string(text: impl Into<Arc<str>>) -> Self {
        Value::String(text.into())
    }

    pub fn symbol(text: &str) -> Self {
        Value::Symbol(Symbol::new(text))
    }

    pub fn list(values: Vec<Value>) -> Self {
        Value::List(Items::from_vec(values))
    }

    pub fn host_type(ty: HostType) -> Self {
        Value::Host(HostHandle::Type(ty))
    }

    pub fn host_object(object: HostObject) -> Self {
        Value::Host(HostHandle::Object(object))
    }

    /// Host-facing type name, shown by `trace` and in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Integer(_) => "Int64",
            Value::Float(_) => "Double",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "List",
            Value::Action(_) => "Action",
            Value::Host(HostHandle::Type(_)) => "Type",
            Value::Host(HostHandle::Object(object)) => object.host_type().name(),
            Value::Callback(_) => "Callback",
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Items> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_host_type(&self) -> Option<&HostType> {
        match self {
            Value::Host(HostHandle::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    /// The list itself, or a one-element list holding this value.
    pub fn to_items(&self) -> Items {
        match self {
            Value::List(items) => items.clone(),
            other => Items::single(other.clone()),
        }
    }

    /// Text of strings and symbols; printed form of anything else.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(text) => text.to_string(),
            Value::Symbol(symbol) => symbol.as_str().to_string(),
            other => other.to_string(),
        }
    }

    /// `<printed> [<TypeName>]`, the form `trace` emits.
    pub fn describe(&self) -> String {
        format!("{self} [{}]", self.type_name())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Action(a), Value::Action(b)) => a == b,
            (Value::Host(a), Value::Host(b)) => a == b,
            (Value::Callback(a), Value::Callback(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(text) => f.write_str(text),
            Value::Symbol(symbol) => write!(f, "{symbol}"),
            Value::List(items) => write!(f, "{items}"),
            Value::Action(action) => write!(f, "{action}"),
            Value::Host(handle) => write!(f, "{handle}"),
            Value::Callback(callback) => write!(f, "{callback}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Items> for Value {
    fn from(items: Items) -> Self {
        Value::List(items)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}
