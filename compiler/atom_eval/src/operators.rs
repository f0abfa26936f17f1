//! Late-bound operators and built-in conversions.
//!
//! Dispatch is an explicit switch over operand tags. Integer arithmetic is
//! checked; any float operand promotes the result to a float.

use std::cmp::Ordering;

use atom_ir::{OperatorKind, Symbol, Value};

use crate::EvalError;

/// Apply a binary operator: `lhs op rhs`.
pub fn binary(op: OperatorKind, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => integer_binary(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_binary(op, *a, *b),
        (Value::Integer(a), Value::Float(b)) => float_binary(op, widen(*a), *b),
        (Value::Float(a), Value::Integer(b)) => float_binary(op, *a, widen(*b)),
        (Value::String(a), Value::String(b)) => match op {
            OperatorKind::Add => Ok(Value::string(format!("{a}{b}"))),
            _ => compare(op, a.as_ref().cmp(b.as_ref()))
                .ok_or_else(|| operand_types(op, lhs, Some(rhs))),
        },
        (Value::String(a), other) if op == OperatorKind::Add => {
            Ok(Value::string(format!("{a}{other}")))
        }
        (other, Value::String(b)) if op == OperatorKind::Add => {
            Ok(Value::string(format!("{other}{b}")))
        }
        (Value::Boolean(a), Value::Boolean(b)) => match op {
            OperatorKind::And => Ok(Value::Boolean(*a && *b)),
            OperatorKind::Or => Ok(Value::Boolean(*a || *b)),
            OperatorKind::ExclusiveOr => Ok(Value::Boolean(a ^ b)),
            OperatorKind::Equal => Ok(Value::Boolean(a == b)),
            OperatorKind::NotEqual => Ok(Value::Boolean(a != b)),
            _ => Err(operand_types(op, lhs, Some(rhs))),
        },
        (Value::Symbol(_), Value::Symbol(_))
        | (Value::List(_), Value::List(_))
        | (Value::Host(_), Value::Host(_)) => match op {
            OperatorKind::Equal => Ok(Value::Boolean(lhs == rhs)),
            OperatorKind::NotEqual => Ok(Value::Boolean(lhs != rhs)),
            _ => Err(operand_types(op, lhs, Some(rhs))),
        },
        _ => Err(operand_types(op, lhs, Some(rhs))),
    }
}

/// Apply a unary operator.
pub fn unary(op: OperatorKind, operand: &Value) -> Result<Value, EvalError> {
    match (op, operand) {
        (OperatorKind::Negate, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or(EvalError::Overflow(op)),
        (OperatorKind::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (OperatorKind::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (OperatorKind::Not | OperatorKind::OnesComplement, Value::Integer(n)) => {
            Ok(Value::Integer(!n))
        }
        _ => Err(operand_types(op, operand, None)),
    }
}

/// Truthiness used by `if` and `while`.
pub fn is_true(value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(n) => Ok(*n != 0),
        Value::Float(x) => Ok(*x != 0.0),
        other => Err(EvalError::type_mismatch("condition", other)),
    }
}

/// Conversion to a type the interpreter knows natively.
///
/// Returns `None` when `target` is not a built-in type name, leaving the
/// conversion to the host bridge.
pub fn convert_builtin(value: &Value, target: &str) -> Option<Result<Value, EvalError>> {
    let converted = match target {
        "Int64" | "Int32" => to_integer(value),
        "Double" | "Single" => to_float(value),
        "String" => Ok(Value::string(value.to_text())),
        "Boolean" => to_boolean(value),
        "Symbol" => Ok(Value::Symbol(Symbol::new(value.to_text()))),
        _ => return None,
    };
    Some(converted)
}

fn integer_binary(op: OperatorKind, a: i64, b: i64) -> Result<Value, EvalError> {
    let overflow = || EvalError::Overflow(op);
    let result = match op {
        OperatorKind::Add => a.checked_add(b).ok_or_else(overflow)?,
        OperatorKind::Subtract => a.checked_sub(b).ok_or_else(overflow)?,
        OperatorKind::Multiply => a.checked_mul(b).ok_or_else(overflow)?,
        OperatorKind::Divide | OperatorKind::Modulo if b == 0 => {
            return Err(EvalError::DivisionByZero)
        }
        OperatorKind::Divide => a.checked_div(b).ok_or_else(overflow)?,
        OperatorKind::Modulo => a.checked_rem(b).ok_or_else(overflow)?,
        OperatorKind::And => a & b,
        OperatorKind::Or => a | b,
        OperatorKind::ExclusiveOr => a ^ b,
        // Shift counts wrap at the operand width.
        OperatorKind::LeftShift => a.wrapping_shl(shift_count(b)),
        OperatorKind::RightShift => a.wrapping_shr(shift_count(b)),
        _ => {
            return compare(op, a.cmp(&b)).ok_or_else(|| {
                operand_types(op, &Value::Integer(a), Some(&Value::Integer(b)))
            })
        }
    };
    Ok(Value::Integer(result))
}

fn float_binary(op: OperatorKind, a: f64, b: f64) -> Result<Value, EvalError> {
    let result = match op {
        OperatorKind::Add => a + b,
        OperatorKind::Subtract => a - b,
        OperatorKind::Multiply => a * b,
        OperatorKind::Divide => a / b,
        OperatorKind::Modulo => a % b,
        OperatorKind::Equal => return Ok(Value::Boolean(a == b)),
        OperatorKind::NotEqual => return Ok(Value::Boolean(a != b)),
        OperatorKind::LessThan => return Ok(Value::Boolean(a < b)),
        OperatorKind::LessThanOrEqual => return Ok(Value::Boolean(a <= b)),
        OperatorKind::GreaterThan => return Ok(Value::Boolean(a > b)),
        OperatorKind::GreaterThanOrEqual => return Ok(Value::Boolean(a >= b)),
        _ => {
            return Err(operand_types(
                op,
                &Value::Float(a),
                Some(&Value::Float(b)),
            ))
        }
    };
    Ok(Value::Float(result))
}

/// Comparison operators over a total order; `None` for anything else.
fn compare(op: OperatorKind, ordering: Ordering) -> Option<Value> {
    let result = match op {
        OperatorKind::Equal => ordering.is_eq(),
        OperatorKind::NotEqual => ordering.is_ne(),
        OperatorKind::LessThan => ordering.is_lt(),
        OperatorKind::LessThanOrEqual => ordering.is_le(),
        OperatorKind::GreaterThan => ordering.is_gt(),
        OperatorKind::GreaterThanOrEqual => ordering.is_ge(),
        _ => return None,
    };
    Some(Value::Boolean(result))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "masked to 0..=63 before the cast"
)]
fn shift_count(count: i64) -> u32 {
    (count & 63) as u32
}

#[expect(
    clippy::cast_precision_loss,
    reason = "mixed integer/float arithmetic promotes like the host numeric tower"
)]
fn widen(n: i64) -> f64 {
    n as f64
}

fn to_integer(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Float(x) => float_to_integer(*x)
            .map(Value::Integer)
            .ok_or_else(|| EvalError::type_mismatch("Int64", value)),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| EvalError::type_mismatch("Int64", value)),
        other => Err(EvalError::type_mismatch("Int64", other)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range checked before truncating toward zero"
)]
fn float_to_integer(x: f64) -> Option<i64> {
    let truncated = x.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn to_float(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Integer(n) => Ok(Value::Float(widen(*n))),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::type_mismatch("Double", value)),
        other => Err(EvalError::type_mismatch("Double", other)),
    }
}

fn to_boolean(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(EvalError::type_mismatch("Boolean", value)),
        },
        other => is_true(other)
            .map(Value::Boolean)
            .map_err(|_| EvalError::type_mismatch("Boolean", other)),
    }
}

fn operand_types(op: OperatorKind, lhs: &Value, rhs: Option<&Value>) -> EvalError {
    let operands = match rhs {
        Some(rhs) => format!("{} and {}", lhs.type_name(), rhs.type_name()),
        None => lhs.type_name().to_string(),
    };
    EvalError::OperandTypes { op, operands }
}

#[cfg(test)]
mod tests;
