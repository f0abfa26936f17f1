//! The standard host module: `core`, namespace `System`.
//!
//! Referenced by every runtime at construction, so these names are bound
//! before a program starts.

use std::any::Any;

use atom_ir::{Callback, Items, OperatorKind, Signature, Symbol, Value};
use parking_lot::Mutex;

use super::registry::{builtin_type, object, Invocation, Receiver, TypeDescriptor};
use super::{MemberFlags, ModuleDescriptor};
use crate::operators::{convert_builtin, is_true};
use crate::HostError;

pub(crate) const MODULE: &str = "core";
pub(crate) const NAMESPACE: &str = "System";

/// Build the standard module.
pub fn std_module() -> ModuleDescriptor {
    ModuleDescriptor::new(MODULE)
        .with_type(math())
        .with_type(string())
        .with_type(list())
        .with_type(parse_type("Int64", Value::Integer(i64::MAX), Value::Integer(i64::MIN)))
        .with_type(parse_type("Double", Value::Float(f64::MAX), Value::Float(f64::MIN)))
        .with_type(TypeDescriptor::new(builtin_type("Boolean")).method(
            "Parse",
            Receiver::Static,
            Some(1),
            |inv| parse(&inv, "Boolean"),
        ))
        .with_type(TypeDescriptor::new(builtin_type("Void")))
        .with_type(TypeDescriptor::new(builtin_type("Object")))
        .with_type(string_builder())
        .with_type(signal())
        .with_type(binding_flags())
        .with_type(expression_type())
        .with_type(TypeDescriptor::new(builtin_type("Action")).delegate(Signature {
            params: Vec::new(),
            returns: None,
        }))
        .with_type(TypeDescriptor::new(builtin_type("Func")).delegate(Signature {
            params: vec![builtin_type("Object")],
            returns: Some(builtin_type("Object")),
        }))
}

fn math() -> TypeDescriptor {
    TypeDescriptor::new(builtin_type("Math"))
        .method("Abs", Receiver::Static, Some(1), |inv| match inv.arg(0)? {
            Value::Integer(n) => n
                .checked_abs()
                .map(|n| Some(Value::Integer(n)))
                .ok_or_else(|| HostError::Failed("Abs overflows Int64".to_string())),
            _ => Ok(Some(Value::Float(inv.float(0)?.abs()))),
        })
        .method("Max", Receiver::Static, Some(2), |inv| {
            numeric_pair(&inv, i64::max, f64::max)
        })
        .method("Min", Receiver::Static, Some(2), |inv| {
            numeric_pair(&inv, i64::min, f64::min)
        })
        .method("Pow", Receiver::Static, Some(2), |inv| {
            Ok(Some(Value::Float(inv.float(0)?.powf(inv.float(1)?))))
        })
        .method("Sqrt", Receiver::Static, Some(1), |inv| {
            Ok(Some(Value::Float(inv.float(0)?.sqrt())))
        })
        .field("PI", Receiver::Static, |_| {
            Ok(Some(Value::Float(std::f64::consts::PI)))
        })
}

/// Integers stay integers; anything else is compared as floats.
fn numeric_pair(
    inv: &Invocation<'_>,
    integer: fn(i64, i64) -> i64,
    float: fn(f64, f64) -> f64,
) -> Result<Option<Value>, HostError> {
    if let (Value::Integer(a), Value::Integer(b)) = (inv.arg(0)?, inv.arg(1)?) {
        return Ok(Some(Value::Integer(integer(*a, *b))));
    }
    Ok(Some(Value::Float(float(inv.float(0)?, inv.float(1)?))))
}

fn this_text(inv: &Invocation<'_>) -> Result<String, HostError> {
    match inv.this()? {
        Value::String(text) => Ok(text.to_string()),
        other => Err(HostError::Argument {
            index: 0,
            expected: "String",
            found: other.describe(),
        }),
    }
}

fn char_count(text: &str) -> Value {
    Value::Integer(i64::try_from(text.chars().count()).unwrap_or(i64::MAX))
}

fn index_arg(inv: &Invocation<'_>, index: usize) -> Result<usize, HostError> {
    let n = inv.integer(index)?;
    usize::try_from(n).map_err(|_| HostError::Argument {
        index,
        expected: "a non-negative index",
        found: n.to_string(),
    })
}

fn string() -> TypeDescriptor {
    TypeDescriptor::new(builtin_type("String"))
        .method("Concat", Receiver::Static, None, |inv| {
            let joined: String = inv.args.iter().map(Value::to_text).collect();
            Ok(Some(Value::string(joined)))
        })
        .property("Length", Receiver::Instance, |inv| {
            Ok(Some(char_count(&this_text(&inv)?)))
        })
        .method("ToUpper", Receiver::Instance, Some(0), |inv| {
            Ok(Some(Value::string(this_text(&inv)?.to_uppercase())))
        })
        .method("ToLower", Receiver::Instance, Some(0), |inv| {
            Ok(Some(Value::string(this_text(&inv)?.to_lowercase())))
        })
        .method("Substring", Receiver::Instance, None, |inv| {
            let text = this_text(&inv)?;
            let start = index_arg(&inv, 0)?;
            let rest = text.chars().skip(start);
            let sub: String = if inv.args.len() > 1 {
                rest.take(index_arg(&inv, 1)?).collect()
            } else {
                rest.collect()
            };
            Ok(Some(Value::string(sub)))
        })
        .method("Contains", Receiver::Instance, Some(1), |inv| {
            let text = this_text(&inv)?;
            Ok(Some(Value::Boolean(text.contains(&inv.text(0)?))))
        })
}

fn this_list(inv: &Invocation<'_>) -> Result<Items, HostError> {
    match inv.this()? {
        Value::List(items) => Ok(items.clone()),
        other => Err(HostError::Argument {
            index: 0,
            expected: "List",
            found: other.describe(),
        }),
    }
}

fn out_of_range(index: usize) -> HostError {
    HostError::Failed(format!("index {index} is out of range"))
}

/// Instance members act on the list itself, so every alias sees a change.
fn list() -> TypeDescriptor {
    TypeDescriptor::new(builtin_type("List"))
        .constructor(None, |inv| Ok(Some(Value::list(inv.args.to_vec()))))
        .property("Count", Receiver::Instance, |inv| {
            let count = this_list(&inv)?.len();
            Ok(Some(Value::Integer(i64::try_from(count).unwrap_or(i64::MAX))))
        })
        .method("Item", Receiver::Instance, Some(1), |inv| {
            let index = index_arg(&inv, 0)?;
            this_list(&inv)?
                .get(index)
                .map(Some)
                .ok_or_else(|| out_of_range(index))
        })
        .void_method("Item", Receiver::Instance, Some(2), |inv| {
            let index = index_arg(&inv, 0)?;
            this_list(&inv)?
                .replace(index, inv.arg(1)?.clone())
                .map(|_| None)
                .ok_or_else(|| out_of_range(index))
        })
        .void_method("Add", Receiver::Instance, Some(1), |inv| {
            this_list(&inv)?.push(inv.arg(0)?.clone());
            Ok(None)
        })
        .void_method("Insert", Receiver::Instance, Some(2), |inv| {
            let index = index_arg(&inv, 0)?;
            if this_list(&inv)?.insert(index, inv.arg(1)?.clone()) {
                Ok(None)
            } else {
                Err(out_of_range(index))
            }
        })
        .void_method("RemoveAt", Receiver::Instance, Some(1), |inv| {
            let index = index_arg(&inv, 0)?;
            this_list(&inv)?
                .remove(index)
                .map(|_| None)
                .ok_or_else(|| out_of_range(index))
        })
        .void_method("Clear", Receiver::Instance, Some(0), |inv| {
            this_list(&inv)?.clear();
            Ok(None)
        })
        .method("Reverse", Receiver::Instance, Some(0), |inv| {
            let mut values = this_list(&inv)?.to_vec();
            values.reverse();
            Ok(Some(Value::list(values)))
        })
        .method("Contains", Receiver::Instance, Some(1), |inv| {
            let needle = inv.arg(0)?;
            Ok(Some(Value::Boolean(this_list(&inv)?.to_vec().contains(needle))))
        })
        .method("Select", Receiver::Instance, Some(1), |mut inv| {
            let selector = inv.callback(0)?;
            let mut mapped = Vec::new();
            for value in this_list(&inv)?.to_vec() {
                mapped.push(call_one(&mut inv, &selector, value)?);
            }
            Ok(Some(Value::list(mapped)))
        })
        .method("Where", Receiver::Instance, Some(1), |mut inv| {
            let predicate = inv.callback(0)?;
            let mut kept = Vec::new();
            for value in this_list(&inv)?.to_vec() {
                let verdict = call_one(&mut inv, &predicate, value.clone())?;
                if is_true(&verdict).map_err(HostError::from)? {
                    kept.push(value);
                }
            }
            Ok(Some(Value::list(kept)))
        })
}

/// Call a one-argument delegate that must produce a value.
fn call_one(inv: &mut Invocation<'_>, callback: &Callback, arg: Value) -> Result<Value, HostError> {
    inv.call(callback, vec![arg])?
        .ok_or_else(|| HostError::Failed("delegate returned nothing".to_string()))
}

fn parse(inv: &Invocation<'_>, target: &str) -> Result<Option<Value>, HostError> {
    let text = Value::string(inv.text(0)?);
    match convert_builtin(&text, target) {
        Some(Ok(value)) => Ok(Some(value)),
        _ => Err(HostError::Conversion {
            value: text.to_string(),
            target: target.to_string(),
        }),
    }
}

fn parse_type(name: &'static str, max: Value, min: Value) -> TypeDescriptor {
    TypeDescriptor::new(builtin_type(name))
        .method("Parse", Receiver::Static, Some(1), move |inv| parse(&inv, name))
        .field("MaxValue", Receiver::Static, move |_| Ok(Some(max.clone())))
        .field("MinValue", Receiver::Static, move |_| Ok(Some(min.clone())))
}

/// Growable text buffer with reference semantics.
#[derive(Debug, Default)]
struct TextBuffer(Mutex<String>);

impl atom_ir::HostData for TextBuffer {
    fn render(&self) -> String {
        self.0.lock().clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn string_builder() -> TypeDescriptor {
    let ty = builtin_type("StringBuilder");
    let make = ty.clone();
    TypeDescriptor::new(ty)
        .constructor(None, move |inv| {
            let initial: String = inv.args.iter().map(Value::to_text).collect();
            Ok(Some(object(make.clone(), TextBuffer(Mutex::new(initial)))))
        })
        .void_method("Append", Receiver::Instance, Some(1), |inv| {
            let buffer = inv.this_object::<TextBuffer>("StringBuilder")?;
            buffer.0.lock().push_str(&inv.arg(0)?.to_text());
            Ok(None)
        })
        .method("ToString", Receiver::Instance, Some(0), |inv| {
            let buffer = inv.this_object::<TextBuffer>("StringBuilder")?;
            Ok(Some(Value::string(buffer.0.lock().as_str())))
        })
        .property("Length", Receiver::Instance, |inv| {
            let buffer = inv.this_object::<TextBuffer>("StringBuilder")?;
            Ok(Some(char_count(&buffer.0.lock())))
        })
}

/// Event source whose `Raise` calls every handler with (signal, argument).
#[derive(Debug, Default)]
struct SignalSource {
    handlers: Mutex<Vec<Callback>>,
}

impl atom_ir::HostData for SignalSource {
    fn render(&self) -> String {
        format!("Signal({} handlers)", self.handlers.lock().len())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn signal() -> TypeDescriptor {
    let ty = builtin_type("Signal");
    let make = ty.clone();
    TypeDescriptor::new(ty)
        .constructor(Some(0), move |_| {
            Ok(Some(object(make.clone(), SignalSource::default())))
        })
        .event("Raised", |inv| {
            let handler = inv.callback(0)?;
            let source = inv.this_object::<SignalSource>("Signal")?;
            source.handlers.lock().push(handler);
            Ok(None)
        })
        .void_method("Raise", Receiver::Instance, Some(1), |mut inv| {
            let handlers = inv.this_object::<SignalSource>("Signal")?.handlers.lock().clone();
            let sender = inv.this()?.clone();
            let arg = inv.arg(0)?.clone();
            for handler in &handlers {
                inv.call(handler, vec![sender.clone(), arg.clone()])?;
            }
            Ok(None)
        })
        .property("HandlerCount", Receiver::Instance, |inv| {
            let count = inv.this_object::<SignalSource>("Signal")?.handlers.lock().len();
            Ok(Some(Value::Integer(i64::try_from(count).unwrap_or(i64::MAX))))
        })
}

fn binding_flags() -> TypeDescriptor {
    const NAMED: [(&str, MemberFlags); 9] = [
        ("Instance", MemberFlags::INSTANCE),
        ("Static", MemberFlags::STATIC),
        ("Public", MemberFlags::PUBLIC),
        ("InvokeMethod", MemberFlags::INVOKE_METHOD),
        ("CreateInstance", MemberFlags::CREATE_INSTANCE),
        ("GetField", MemberFlags::GET_FIELD),
        ("SetField", MemberFlags::SET_FIELD),
        ("GetProperty", MemberFlags::GET_PROPERTY),
        ("SetProperty", MemberFlags::SET_PROPERTY),
    ];
    NAMED
        .into_iter()
        .fold(TypeDescriptor::new(builtin_type("BindingFlags")), |ty, (name, flag)| {
            ty.field(name, Receiver::Static, move |_| {
                Ok(Some(Value::Integer(i64::from(flag.bits()))))
            })
        })
}

fn expression_type() -> TypeDescriptor {
    OperatorKind::ALL
        .into_iter()
        .fold(TypeDescriptor::new(builtin_type("ExpressionType")), |ty, op| {
            ty.field(op.host_name(), Receiver::Static, move |_| {
                Ok(Some(Value::Symbol(Symbol::new(op.host_name()))))
            })
        })
}
