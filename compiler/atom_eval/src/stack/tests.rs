use super::*;
use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Integer).collect()
}

#[test]
fn pop_on_empty_underflows() {
    let mut stack = OperandStack::new();
    assert_eq!(stack.pop(), Err(EvalError::StackUnderflow));
    assert_eq!(stack.peek(), Err(EvalError::StackUnderflow));
}

#[test]
fn pop_n_keeps_push_order() {
    let mut stack = OperandStack::new();
    for v in ints(&[1, 2, 3, 4]) {
        stack.push(v);
    }
    assert_eq!(stack.pop_n(3), Ok(ints(&[2, 3, 4])));
    assert_eq!(stack.as_slice(), ints(&[1]).as_slice());
}

#[test]
fn pop_n_past_bottom_leaves_stack_untouched() {
    let mut stack = OperandStack::new();
    stack.push(Value::Integer(1));
    assert_eq!(stack.pop_n(2), Err(EvalError::StackUnderflow));
    assert_eq!(stack.len(), 1);
}

#[test]
fn pop_count_rejects_negative() {
    let mut stack = OperandStack::new();
    stack.push(Value::Integer(-1));
    assert!(matches!(
        stack.pop_count(),
        Err(EvalError::TypeMismatch {
            expected: "count",
            ..
        })
    ));
}

#[test]
fn pop_text_accepts_strings_and_symbols() {
    let mut stack = OperandStack::new();
    stack.push(Value::string("a"));
    stack.push(Value::symbol("b"));
    assert_eq!(stack.pop_text(), Ok("b".to_string()));
    assert_eq!(stack.pop_text(), Ok("a".to_string()));
}

#[test]
fn pop_list_type_error() {
    let mut stack = OperandStack::new();
    stack.push(Value::Integer(1));
    assert_eq!(
        stack.pop_list(),
        Err(EvalError::TypeMismatch {
            expected: "list",
            found: "1 [Int64]".to_string(),
        })
    );
}
