use super::*;

#[test]
fn host_error_message_names_the_call() {
    let error = EvalError::Host {
        signature: "Math.Abs(x)".to_string(),
        cause: HostError::Argument {
            index: 0,
            expected: "number",
            found: "x [Symbol]".to_string(),
        },
    };
    assert_eq!(
        error.to_string(),
        "Cannot execute 'Math.Abs(x)': argument 0: expected number, found x [Symbol]"
    );
}

#[test]
fn root_cause_unwraps_nested_host_calls() {
    let inner = EvalError::Unbound(Symbol::new("missing"));
    let wrapped = EvalError::Host {
        signature: "List.Select(callback)".to_string(),
        cause: HostError::from(EvalError::Host {
            signature: "Signal.Raise(1)".to_string(),
            cause: HostError::from(inner.clone()),
        }),
    };
    assert_eq!(wrapped.root_cause(), &inner);
}

#[test]
fn root_cause_of_plain_host_failure_is_itself() {
    let error = EvalError::Host {
        signature: "Math.Nope()".to_string(),
        cause: HostError::MissingMember {
            ty: "Math".to_string(),
            member: "Nope".to_string(),
        },
    };
    assert_eq!(error.root_cause(), &error);
}

#[test]
fn type_mismatch_describes_value() {
    let error = EvalError::type_mismatch("list", &Value::Integer(3));
    assert_eq!(error.to_string(), "expected list, found 3 [Int64]");
}

#[test]
fn transparent_wrappers_keep_inner_message() {
    let error = EvalError::from(CallbackError::Paused);
    assert_eq!(error.to_string(), CallbackError::Paused.to_string());
}
