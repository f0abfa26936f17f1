//! Built-in words.

use atom_ir::{NativeAction, Primitive, Symbol, Value};

use super::{operator_factory, Interpreter};
use crate::operators::is_true;
use crate::{EvalError, OutputChannel, RuntimeEvent};

/// Stack length as a pushed integer.
fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl Interpreter {
    pub(super) fn primitive(&mut self, primitive: Primitive) -> Result<(), EvalError> {
        match primitive {
            Primitive::If => self.if_(),
            Primitive::While => self.while_(),
            Primitive::Evaluate => {
                let value = self.stack.pop()?;
                self.evaluate(&value)
            }
            Primitive::EvaluateAndSplit => self.evaluate_and_split(),
            Primitive::Split => self.split(),
            Primitive::Join => self.join(),
            Primitive::Set => self.bind(Target::Set),
            Primitive::Put => self.bind(Target::Put),
            Primitive::Get => self.get(),
            Primitive::Cast => {
                let ty = self.stack.pop_host_type()?;
                let value = self.stack.pop()?;
                let converted = self.convert(&value, &ty)?;
                self.stack.push(converted);
                Ok(())
            }
            Primitive::ToName => {
                let value = self.stack.pop()?;
                self.stack.push(Value::Symbol(Symbol::new(value.to_string())));
                Ok(())
            }
            Primitive::MakeOperation => self.make_operation(),
            Primitive::MakeBinaryAction => self.make_operator(2),
            Primitive::MakeUnaryAction => self.make_operator(1),
            Primitive::Execute => self.execute(),
            Primitive::Invoke => self.invoke(),
            Primitive::Reference => self.reference_primitive(),
            Primitive::CreateEventHandler => self.create_event_handler(),
            Primitive::CreateDelegate => self.create_delegate(),
            Primitive::Break => {
                self.pause(RuntimeEvent::Breaking);
                Ok(())
            }
            Primitive::Output => self.output(OutputChannel::Output),
            Primitive::Show => self.output(OutputChannel::Show),
            Primitive::Trace => {
                let message = self.stack.peek()?.describe();
                self.emit(RuntimeEvent::Outputting {
                    message,
                    channel: OutputChannel::Trace,
                });
                Ok(())
            }
        }
    }

    /// `condition body if`
    fn if_(&mut self) -> Result<(), EvalError> {
        let body = self.stack.pop()?;
        let condition = self.stack.pop()?;
        self.evaluate(&condition)?;
        if is_true(&self.stack.pop()?)? {
            self.evaluate(&body)?;
        }
        Ok(())
    }

    /// `condition body while`
    fn while_(&mut self) -> Result<(), EvalError> {
        let body = self.stack.pop()?;
        let condition = self.stack.pop()?;
        self.evaluate(&condition)?;
        while is_true(&self.stack.pop()?)? {
            self.evaluate(&body)?;
            self.evaluate(&condition)?;
        }
        Ok(())
    }

    /// Evaluate the popped value and push how many values it left.
    pub(super) fn evaluate_and_split(&mut self) -> Result<(), EvalError> {
        let value = self.stack.pop()?;
        let before = self.stack.len();
        self.evaluate(&value)?;
        let produced = count(self.stack.len()) - count(before);
        self.stack.push(Value::Integer(produced));
        Ok(())
    }

    fn split(&mut self) -> Result<(), EvalError> {
        let values = self.stack.pop_list()?.to_vec();
        let n = values.len();
        for value in values {
            self.stack.push(value);
        }
        self.stack.push(Value::Integer(count(n)));
        Ok(())
    }

    fn join(&mut self) -> Result<(), EvalError> {
        let n = self.stack.pop_count()?;
        let values = self.stack.pop_n(n)?;
        self.stack.push(Value::list(values));
        Ok(())
    }

    /// Keys from a symbol or a list of symbols (strings are accepted too).
    fn pop_keys(&mut self) -> Result<Vec<Symbol>, EvalError> {
        let key_of = |value: &Value| match value {
            Value::Symbol(symbol) => Ok(symbol.clone()),
            Value::String(text) => Ok(Symbol::new(text.as_ref())),
            other => Err(EvalError::type_mismatch("key", other)),
        };
        match self.stack.pop()? {
            Value::List(keys) => keys.to_vec().iter().map(key_of).collect(),
            single => Ok(vec![key_of(&single)?]),
        }
    }

    /// Bind keys right to left, so `1 2 (a b) set` binds `a` to 1.
    fn bind(&mut self, target: Target) -> Result<(), EvalError> {
        let keys = self.pop_keys()?;
        for key in keys.into_iter().rev() {
            let value = self.stack.pop()?;
            match target {
                Target::Set => self.set_bindings.set(key, value),
                Target::Put => self.put_bindings.set(key, value),
            }
        }
        Ok(())
    }

    fn get(&mut self) -> Result<(), EvalError> {
        for key in self.pop_keys()? {
            let value = self
                .put_bindings
                .get(key.as_str())
                .or_else(|| self.set_bindings.get(key.as_str()))
                .cloned()
                .ok_or(EvalError::Unbound(key))?;
            self.stack.push(value);
        }
        Ok(())
    }

    /// `type make-operation` or `identifier arity make-operation`.
    fn make_operation(&mut self) -> Result<(), EvalError> {
        let action = match self.stack.pop()? {
            Value::Host(atom_ir::HostHandle::Type(ty)) => NativeAction::Convert(ty),
            Value::Integer(arity) => {
                let identifier = self.stack.pop()?;
                let arity = usize::try_from(arity)
                    .map_err(|_| EvalError::type_mismatch("arity", &Value::Integer(arity)))?;
                operator_factory(&identifier, arity)?
            }
            other => return Err(EvalError::type_mismatch("type or arity", &other)),
        };
        self.stack.push(Value::Action(action));
        Ok(())
    }

    fn make_operator(&mut self, arity: usize) -> Result<(), EvalError> {
        let identifier = self.stack.pop()?;
        let action = operator_factory(&identifier, arity)?;
        self.stack.push(Value::Action(action));
        Ok(())
    }

    fn output(&mut self, channel: OutputChannel) -> Result<(), EvalError> {
        let message = self.stack.pop()?.to_string();
        self.emit(RuntimeEvent::Outputting { message, channel });
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum Target {
    Set,
    Put,
}
