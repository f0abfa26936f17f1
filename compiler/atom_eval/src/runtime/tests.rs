use super::*;
use pretty_assertions::assert_eq;

fn runtime() -> (Runtime, Observer) {
    match Runtime::new() {
        Ok(pair) => pair,
        Err(error) => panic!("runtime construction failed: {error}"),
    }
}

#[test]
fn read_code_prefers_an_existing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("prog.atom"), "1 2 add")?;
    assert_eq!(read_code(dir.path(), "prog.atom")?, "1 2 add");
    assert_eq!(read_code(dir.path(), "3 4 add")?, "3 4 add");
    assert_eq!(read_code(dir.path(), "missing.atom")?, "missing.atom");
    Ok(())
}

#[test]
fn load_parses_without_evaluating() -> Result<(), RuntimeError> {
    let (runtime, observer) = runtime();
    let root = runtime.load("1 (2 add)")?;
    assert_eq!(root.to_string(), "(1 (2 add))");
    let snapshot = runtime.snapshot();
    assert_eq!(snapshot.root, root);
    assert!(snapshot.stack.is_empty());
    assert!(observer.drain().is_empty());
    Ok(())
}

#[test]
fn run_blocking_leaves_the_stack() -> Result<(), RuntimeError> {
    let (runtime, observer) = runtime();
    runtime.load("3 4 add")?;
    runtime.run_blocking()?;
    assert_eq!(runtime.snapshot().stack, vec![Value::Integer(7)]);
    assert!(!runtime.is_running());
    assert_eq!(observer.drain(), vec![RuntimeEvent::Terminating(None)]);
    Ok(())
}

#[test]
fn each_run_starts_from_an_empty_stack() -> Result<(), RuntimeError> {
    let (runtime, _observer) = runtime();
    runtime.load("1")?;
    runtime.run_blocking()?;
    runtime.run_blocking()?;
    assert_eq!(runtime.snapshot().stack, vec![Value::Integer(1)]);
    Ok(())
}

#[test]
fn failed_run_reports_the_error() -> Result<(), RuntimeError> {
    let (runtime, observer) = runtime();
    runtime.load("add")?;
    assert_eq!(
        runtime.run_blocking(),
        Err(RuntimeError::Eval(EvalError::StackUnderflow))
    );
    assert_eq!(
        observer.drain(),
        vec![RuntimeEvent::Terminating(Some(EvalError::StackUnderflow))]
    );
    Ok(())
}

#[test]
fn run_code_without_evaluate_only_parses() -> Result<(), RuntimeError> {
    let (runtime, observer) = runtime();
    let handle = runtime.run_code("1 2 add", false)?;
    assert_eq!(handle.join().ok(), Some(Ok(())));
    assert!(runtime.snapshot().stack.is_empty());
    assert_eq!(runtime.snapshot().root.len(), 3);
    assert!(observer.drain().is_empty());
    Ok(())
}

#[test]
fn idle_runtime_serves_callbacks_on_the_calling_thread() -> Result<(), RuntimeError> {
    let (runtime, _observer) = runtime();
    runtime.load("(1 add) Func create-delegate")?;
    runtime.run_blocking()?;
    let popped = runtime.interpreter().stack_mut().pop();
    let Ok(Value::Callback(callback)) = popped else {
        panic!("expected a callback, got {popped:?}");
    };
    let result = std::thread::spawn(move || callback.invoke(vec![Value::Integer(4)])).join();
    assert_eq!(result.ok(), Some(Ok(Some(Value::Integer(5)))));
    Ok(())
}

#[test]
fn dropped_runtime_detaches_callbacks() -> Result<(), RuntimeError> {
    let (runtime, _observer) = runtime();
    runtime.load("(show show) create-event-handler")?;
    runtime.run_blocking()?;
    let popped = runtime.interpreter().stack_mut().pop();
    let Ok(Value::Callback(callback)) = popped else {
        panic!("expected a callback, got {popped:?}");
    };
    drop(runtime);
    assert_eq!(
        callback.invoke(vec![Value::Integer(1), Value::Integer(2)]),
        Err(CallbackError::Detached)
    );
    Ok(())
}

#[test]
fn resume_when_not_paused() {
    let (runtime, _observer) = runtime();
    assert!(!runtime.resume(false));
    assert!(!runtime.is_paused());
}
