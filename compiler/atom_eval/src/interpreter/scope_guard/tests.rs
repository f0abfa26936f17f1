use super::*;
use crate::RuntimeConfig;
use atom_ir::{Symbol, Value};

fn interpreter() -> Option<Interpreter> {
    Interpreter::new(&RuntimeConfig::default())
        .ok()
        .map(|(interpreter, _)| interpreter)
}

#[test]
fn scope_is_left_on_drop() {
    let Some(mut interpreter) = interpreter() else {
        panic!("interpreter construction failed");
    };
    let outer = interpreter.put_bindings().depth();
    {
        let mut scoped = interpreter.put_scope();
        assert_eq!(scoped.put_bindings().depth(), outer + 1);
        scoped.put_bindings.set(Symbol::new("local"), Value::Integer(1));
    }
    assert_eq!(interpreter.put_bindings().depth(), outer);
    assert!(!interpreter.put_bindings().contains("local"));
}

#[test]
fn scope_is_left_when_the_body_fails() {
    let Some(mut interpreter) = interpreter() else {
        panic!("interpreter construction failed");
    };
    let outer = interpreter.put_bindings().depth();
    let result = {
        let mut scoped = interpreter.put_scope();
        scoped.evaluate(&Value::symbol("add"))
    };
    assert!(result.is_err());
    assert_eq!(interpreter.put_bindings().depth(), outer);
}
