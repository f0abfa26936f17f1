use super::*;
use crate::host::{std_module, HostRegistry, MemberFlags};
use atom_ir::HostType;
use std::thread;
use std::time::Duration;

fn math_max() -> HostCall {
    HostCall {
        ty: HostType::new("core", "System", "Math"),
        member: "Max".to_string(),
        flags: MemberFlags::STATIC | MemberFlags::PUBLIC | MemberFlags::INVOKE_METHOD,
        target: None,
        args: vec![Value::Integer(2), Value::Integer(5)],
    }
}

fn job(reply: Sender<HostReply>) -> HostJob {
    let (requests, _) = channel::unbounded();
    HostJob {
        bridge: Arc::new(HostRegistry::new().with_module(std_module())),
        call: math_max(),
        callbacks: RemoteCallbacks { requests },
        reply,
    }
}

#[test]
fn inline_notifications_are_queued() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Inline);
    assert!(dispatch.notify(RuntimeEvent::Breaking));
    assert!(dispatch.notify(RuntimeEvent::Terminating(None)));
    assert_eq!(
        observer.drain(),
        vec![RuntimeEvent::Breaking, RuntimeEvent::Terminating(None)]
    );
}

#[test]
fn notify_without_observer_reports_failure() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Observer);
    drop(observer);
    assert!(!dispatch.notify(RuntimeEvent::Stepping));
}

#[test]
fn submit_without_observer_returns_the_job() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Observer);
    drop(observer);
    let (reply, _result) = channel::bounded(1);
    assert!(dispatch.submit(job(reply)).is_err());
}

#[test]
fn inline_mode_never_marshals_jobs() {
    let (dispatch, _observer) = Dispatch::channel(DispatchMode::Inline);
    let (reply, _result) = channel::bounded(1);
    assert!(dispatch.submit(job(reply)).is_err());
}

#[test]
fn queued_events_do_not_wait_for_the_observer() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Observer);
    assert!(dispatch.queue(RuntimeEvent::Stepping));
    assert_eq!(observer.try_next_event(), Some(RuntimeEvent::Stepping));
    assert_eq!(observer.try_next_event(), None);
}

#[test]
fn queued_events_arrive_before_a_pending_rendezvous() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Observer);
    let sender = thread::spawn(move || {
        dispatch.queue(RuntimeEvent::Stepping);
        dispatch.notify(RuntimeEvent::Breaking)
    });
    let first = observer.next_event_timeout(Duration::from_secs(5));
    let second = observer.next_event_timeout(Duration::from_secs(5));
    assert_eq!(first, Some(RuntimeEvent::Stepping));
    assert_eq!(second, Some(RuntimeEvent::Breaking));
    assert_eq!(sender.join().ok(), Some(true));
}

#[test]
fn observer_runs_jobs_while_waiting_for_events() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Observer);
    let watcher = thread::spawn(move || observer.next_event());

    let (reply, result) = channel::bounded(1);
    assert!(dispatch.submit(job(reply)).is_ok());
    assert_eq!(result.recv().ok(), Some(Ok(Some(Value::Integer(5)))));

    assert!(dispatch.notify(RuntimeEvent::Breaking));
    assert_eq!(watcher.join().ok().flatten(), Some(RuntimeEvent::Breaking));
}

#[test]
fn next_event_ends_when_runtime_is_gone() {
    let (dispatch, observer) = Dispatch::channel(DispatchMode::Inline);
    drop(dispatch);
    assert_eq!(observer.next_event(), None);
}

#[test]
fn remote_callbacks_detach_without_evaluator() {
    let (requests, pending) = channel::unbounded::<PendingCallback>();
    drop(pending);
    let mut remote = RemoteCallbacks { requests };
    let port: std::sync::Weak<dyn atom_ir::CallbackPort> =
        std::sync::Weak::<crate::runtime::Shared>::new();
    let callback = Callback::new(
        atom_ir::Items::new(),
        atom_ir::Signature {
            params: vec![],
            returns: None,
        },
        port,
    );
    assert_eq!(
        remote.call(&callback, vec![]),
        Err(EvalError::Callback(CallbackError::Detached))
    );
}
