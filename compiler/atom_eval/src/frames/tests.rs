use super::*;

fn body(values: &[i64]) -> Items {
    values.iter().copied().map(Value::Integer).collect()
}

#[test]
fn push_set_cursor_pop() {
    let mut frames = CallEnvironmentStack::new(None);
    assert_eq!(frames.push(body(&[1, 2]), 0), Ok(()));
    frames.set_cursor(Value::Integer(2));
    assert_eq!(
        frames.current().and_then(|f| f.cursor.clone()),
        Some(Value::Integer(2))
    );
    frames.pop();
    assert_eq!(frames.depth(), 0);
}

#[test]
fn innermost_first_order() {
    let mut frames = CallEnvironmentStack::new(None);
    assert!(frames.push(body(&[1]), 0).is_ok());
    assert!(frames.push(body(&[2]), 1).is_ok());
    let scopes: Vec<usize> = frames.innermost_first().map(|f| f.put_scope).collect();
    assert_eq!(scopes, vec![1, 0]);
}

#[test]
fn depth_limit() {
    let mut frames = CallEnvironmentStack::new(Some(2));
    assert!(frames.push(body(&[]), 0).is_ok());
    assert!(frames.push(body(&[]), 0).is_ok());
    assert_eq!(
        frames.push(body(&[]), 0),
        Err(EvalError::RecursionLimit(2))
    );
    assert_eq!(frames.depth(), 2);
}

#[test]
fn truncate_drops_inner_frames() {
    let mut frames = CallEnvironmentStack::new(None);
    for n in 0..4 {
        assert!(frames.push(body(&[n]), 0).is_ok());
    }
    frames.truncate(1);
    assert_eq!(frames.depth(), 1);
    assert_eq!(frames.current().map(|f| f.items.clone()), Some(body(&[0])));
}
