use super::*;
use pretty_assertions::assert_eq;

fn int(n: i64) -> Value {
    Value::Integer(n)
}

#[test]
fn integer_arithmetic() {
    assert_eq!(binary(OperatorKind::Add, &int(3), &int(4)), Ok(int(7)));
    assert_eq!(binary(OperatorKind::Subtract, &int(3), &int(4)), Ok(int(-1)));
    assert_eq!(binary(OperatorKind::Multiply, &int(6), &int(7)), Ok(int(42)));
    assert_eq!(binary(OperatorKind::Divide, &int(7), &int(2)), Ok(int(3)));
    assert_eq!(binary(OperatorKind::Modulo, &int(7), &int(2)), Ok(int(1)));
}

#[test]
fn division_by_zero() {
    assert_eq!(
        binary(OperatorKind::Divide, &int(1), &int(0)),
        Err(EvalError::DivisionByZero)
    );
    assert_eq!(
        binary(OperatorKind::Modulo, &int(1), &int(0)),
        Err(EvalError::DivisionByZero)
    );
}

#[test]
fn overflow_is_an_error() {
    assert_eq!(
        binary(OperatorKind::Add, &int(i64::MAX), &int(1)),
        Err(EvalError::Overflow(OperatorKind::Add))
    );
    assert_eq!(
        binary(OperatorKind::Divide, &int(i64::MIN), &int(-1)),
        Err(EvalError::Overflow(OperatorKind::Divide))
    );
    assert_eq!(
        unary(OperatorKind::Negate, &int(i64::MIN)),
        Err(EvalError::Overflow(OperatorKind::Negate))
    );
}

#[test]
fn bitwise_and_shifts() {
    assert_eq!(binary(OperatorKind::And, &int(6), &int(3)), Ok(int(2)));
    assert_eq!(binary(OperatorKind::Or, &int(6), &int(3)), Ok(int(7)));
    assert_eq!(binary(OperatorKind::ExclusiveOr, &int(6), &int(3)), Ok(int(5)));
    assert_eq!(binary(OperatorKind::LeftShift, &int(1), &int(4)), Ok(int(16)));
    assert_eq!(binary(OperatorKind::RightShift, &int(-16), &int(2)), Ok(int(-4)));
    assert_eq!(binary(OperatorKind::LeftShift, &int(1), &int(65)), Ok(int(2)));
    assert_eq!(unary(OperatorKind::OnesComplement, &int(0)), Ok(int(-1)));
}

#[test]
fn comparisons() {
    assert_eq!(
        binary(OperatorKind::LessThan, &int(1), &int(2)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        binary(OperatorKind::GreaterThanOrEqual, &int(1), &int(2)),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        binary(OperatorKind::LessThan, &Value::string("abc"), &Value::string("abd")),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn float_promotion() {
    assert_eq!(
        binary(OperatorKind::Add, &int(1), &Value::Float(0.5)),
        Ok(Value::Float(1.5))
    );
    assert_eq!(
        binary(OperatorKind::Equal, &Value::Float(2.0), &int(2)),
        Ok(Value::Boolean(true))
    );
    assert!(matches!(
        binary(OperatorKind::And, &Value::Float(1.0), &int(1)),
        Err(EvalError::OperandTypes { .. })
    ));
}

#[test]
fn string_concatenation() {
    assert_eq!(
        binary(OperatorKind::Add, &Value::string("n="), &int(3)),
        Ok(Value::string("n=3"))
    );
    assert_eq!(
        binary(OperatorKind::Add, &int(3), &Value::string("!")),
        Ok(Value::string("3!"))
    );
}

#[test]
fn boolean_logic() {
    let t = Value::Boolean(true);
    let f = Value::Boolean(false);
    assert_eq!(binary(OperatorKind::And, &t, &f), Ok(f.clone()));
    assert_eq!(binary(OperatorKind::Or, &t, &f), Ok(t.clone()));
    assert_eq!(binary(OperatorKind::ExclusiveOr, &t, &t), Ok(f.clone()));
    assert_eq!(unary(OperatorKind::Not, &f), Ok(t));
}

#[test]
fn equality_of_symbols_and_lists() {
    assert_eq!(
        binary(OperatorKind::Equal, &Value::symbol("a"), &Value::symbol("a")),
        Ok(Value::Boolean(true))
    );
    let list = Value::list(vec![int(1)]);
    assert_eq!(
        binary(OperatorKind::NotEqual, &list, &Value::list(vec![int(2)])),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn mismatched_operands() {
    let err = binary(OperatorKind::Subtract, &Value::symbol("a"), &int(1));
    assert_eq!(
        err,
        Err(EvalError::OperandTypes {
            op: OperatorKind::Subtract,
            operands: "Symbol and Int64".to_string(),
        })
    );
}

#[test]
fn truthiness() {
    assert_eq!(is_true(&Value::Boolean(true)), Ok(true));
    assert_eq!(is_true(&int(0)), Ok(false));
    assert_eq!(is_true(&int(-2)), Ok(true));
    assert_eq!(is_true(&Value::Float(0.0)), Ok(false));
    assert!(is_true(&Value::symbol("x")).is_err());
}

#[test]
fn builtin_conversions() {
    assert_eq!(convert_builtin(&Value::Float(2.9), "Int64"), Some(Ok(int(2))));
    assert_eq!(
        convert_builtin(&Value::string("42"), "Int64"),
        Some(Ok(int(42)))
    );
    assert_eq!(
        convert_builtin(&int(2), "Double"),
        Some(Ok(Value::Float(2.0)))
    );
    assert_eq!(
        convert_builtin(&int(12), "String"),
        Some(Ok(Value::string("12")))
    );
    assert_eq!(
        convert_builtin(&Value::string("name"), "Symbol"),
        Some(Ok(Value::symbol("name")))
    );
    assert_eq!(
        convert_builtin(&Value::string("True"), "Boolean"),
        Some(Ok(Value::Boolean(true)))
    );
    assert!(convert_builtin(&int(1), "StringBuilder").is_none());
    assert!(matches!(
        convert_builtin(&Value::Float(f64::NAN), "Int64"),
        Some(Err(EvalError::TypeMismatch { .. }))
    ));
}
