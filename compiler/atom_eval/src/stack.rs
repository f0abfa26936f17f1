//! Operand stack.

use atom_ir::{HostHandle, HostType, Items, Value};

use crate::EvalError;

/// LIFO of values shared by every primitive.
#[derive(Clone, Debug, Default)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value, EvalError> {
        self.values.pop().ok_or(EvalError::StackUnderflow)
    }

    pub fn peek(&self) -> Result<&Value, EvalError> {
        self.values.last().ok_or(EvalError::StackUnderflow)
    }

    /// Pop `n` values, returned in the order they were pushed.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, EvalError> {
        if n > self.values.len() {
            return Err(EvalError::StackUnderflow);
        }
        Ok(self.values.split_off(self.values.len() - n))
    }

    pub fn pop_list(&mut self) -> Result<Items, EvalError> {
        match self.pop()? {
            Value::List(items) => Ok(items),
            other => Err(EvalError::type_mismatch("list", &other)),
        }
    }

    /// Pop a non-negative integer count.
    pub fn pop_count(&mut self) -> Result<usize, EvalError> {
        match self.pop()? {
            Value::Integer(n) => {
                usize::try_from(n).map_err(|_| EvalError::type_mismatch("count", &Value::Integer(n)))
            }
            other => Err(EvalError::type_mismatch("count", &other)),
        }
    }

    pub fn pop_integer(&mut self) -> Result<i64, EvalError> {
        match self.pop()? {
            Value::Integer(n) => Ok(n),
            other => Err(EvalError::type_mismatch("integer", &other)),
        }
    }

    /// Pop a string or symbol as text.
    pub fn pop_text(&mut self) -> Result<String, EvalError> {
        match self.pop()? {
            Value::String(text) => Ok(text.to_string()),
            Value::Symbol(symbol) => Ok(symbol.as_str().to_string()),
            other => Err(EvalError::type_mismatch("name", &other)),
        }
    }

    pub fn pop_host_type(&mut self) -> Result<HostType, EvalError> {
        match self.pop()? {
            Value::Host(HostHandle::Type(ty)) => Ok(ty),
            other => Err(EvalError::type_mismatch("type", &other)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

#[cfg(test)]
mod tests;
