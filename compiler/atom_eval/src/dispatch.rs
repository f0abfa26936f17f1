//! Delivery of notifications and host jobs to the observer.
//!
//! In [`DispatchMode::Inline`] notifications are queued on an unbounded
//! channel and host calls run on the evaluation thread. In
//! [`DispatchMode::Observer`] they go through a rendezvous channel instead:
//! each message blocks until the observer takes it, and host calls run on
//! the observer's thread while the evaluator waits for the reply.

use std::sync::Arc;
use std::time::{Duration, Instant};

use atom_ir::{Callback, CallbackError, Value};
use crossbeam::channel::{self, Receiver, Select, SendError, Sender, TryRecvError};

use crate::host::{CallbackContext, HostBridge, HostCall};
use crate::session::PendingCallback;
use crate::{EvalError, HostError};

/// Where host calls run and how notifications are delivered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    #[default]
    Inline,
    Observer,
}

/// Which primitive produced an `Outputting` notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputChannel {
    Output,
    Show,
    Trace,
}

/// Notification sent by the evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeEvent {
    /// `break` paused evaluation.
    Breaking,
    /// A step paused evaluation before the next element.
    Stepping,
    Outputting {
        message: String,
        channel: OutputChannel,
    },
    /// The run ended, with its error if it failed.
    Terminating(Option<EvalError>),
}

pub(crate) type HostReply = Result<Option<Value>, HostError>;

/// A host call to run on the observer's thread.
pub(crate) struct HostJob {
    pub(crate) bridge: Arc<dyn HostBridge>,
    pub(crate) call: HostCall,
    pub(crate) callbacks: RemoteCallbacks,
    pub(crate) reply: Sender<HostReply>,
}

impl HostJob {
    fn run(mut self) {
        let result = self.bridge.invoke(&self.call, &mut self.callbacks);
        // The evaluator may have stopped waiting; nothing to report to.
        let _ = self.reply.send(result);
    }
}

/// Callbacks made by a host job, forwarded to the waiting evaluator.
pub(crate) struct RemoteCallbacks {
    pub(crate) requests: Sender<PendingCallback>,
}

impl CallbackContext for RemoteCallbacks {
    fn call(&mut self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, EvalError> {
        let detached = || EvalError::Callback(CallbackError::Detached);
        let (reply, result) = channel::bounded(1);
        self.requests
            .send(PendingCallback {
                callback: callback.clone(),
                args,
                reply,
            })
            .map_err(|_| detached())?;
        result.recv().map_err(|_| detached())?
    }
}

pub(crate) enum Message {
    Event(RuntimeEvent),
    Job(HostJob),
}

/// Sending half, owned by the interpreter.
///
/// Observer mode adds a rendezvous channel next to the queue. Notifications
/// raised while serving a callback for another thread always use the queue:
/// that thread may be the observer, blocked until the callback returns.
#[derive(Clone)]
pub(crate) struct Dispatch {
    queued: Sender<Message>,
    rendezvous: Option<Sender<Message>>,
}

impl Dispatch {
    pub(crate) fn channel(mode: DispatchMode) -> (Dispatch, Observer) {
        let (queued, queued_rx) = channel::unbounded();
        let (rendezvous, rendezvous_rx) = match mode {
            DispatchMode::Inline => (None, None),
            DispatchMode::Observer => {
                let (tx, rx) = channel::bounded(0);
                (Some(tx), Some(rx))
            }
        };
        (
            Dispatch { queued, rendezvous },
            Observer {
                queued: queued_rx,
                rendezvous: rendezvous_rx,
            },
        )
    }

    /// Deliver a notification; `false` when no observer is listening.
    pub(crate) fn notify(&self, event: RuntimeEvent) -> bool {
        tracing::trace!(?event, "notify");
        let sender = self.rendezvous.as_ref().unwrap_or(&self.queued);
        sender.send(Message::Event(event)).is_ok()
    }

    /// Queue a notification without waiting for the observer.
    pub(crate) fn queue(&self, event: RuntimeEvent) -> bool {
        tracing::trace!(?event, "queue");
        self.queued.send(Message::Event(event)).is_ok()
    }

    /// Hand a host job to the observer. The job comes back when host calls
    /// run inline or nobody listens.
    pub(crate) fn submit(&self, job: HostJob) -> Result<(), HostJob> {
        let Some(rendezvous) = &self.rendezvous else {
            return Err(job);
        };
        if let Err(SendError(Message::Job(job))) = rendezvous.send(Message::Job(job)) {
            return Err(job);
        }
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum Wait {
    Block,
    Poll,
    Until(Instant),
}

/// Receiving half, held by whoever drives the debugger.
///
/// Receiving also runs host jobs marshaled to this thread, so in
/// [`DispatchMode::Observer`] the observer must keep calling one of the
/// `next_event` methods while a run is in progress.
#[derive(Clone)]
pub struct Observer {
    queued: Receiver<Message>,
    rendezvous: Option<Receiver<Message>>,
}

impl Observer {
    /// Block for the next notification. `None` once the runtime is gone.
    pub fn next_event(&self) -> Option<RuntimeEvent> {
        self.next(Wait::Block)
    }

    /// The next notification already waiting, if any.
    pub fn try_next_event(&self) -> Option<RuntimeEvent> {
        self.next(Wait::Poll)
    }

    /// Wait up to `timeout` for the next notification.
    pub fn next_event_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        self.next(Wait::Until(Instant::now() + timeout))
    }

    /// Every notification already waiting.
    pub fn drain(&self) -> Vec<RuntimeEvent> {
        std::iter::from_fn(|| self.try_next_event()).collect()
    }

    fn next(&self, wait: Wait) -> Option<RuntimeEvent> {
        loop {
            match self.receive(wait)? {
                Message::Event(event) => return Some(event),
                Message::Job(job) => job.run(),
            }
        }
    }

    /// Queued messages first: they were sent before any pending rendezvous.
    fn receive(&self, wait: Wait) -> Option<Message> {
        match self.queued.try_recv() {
            Ok(message) => return Some(message),
            Err(TryRecvError::Disconnected) => return None,
            Err(TryRecvError::Empty) => {}
        }
        let mut select = Select::new();
        let queued = select.recv(&self.queued);
        let rendezvous = self.rendezvous.as_ref().map(|r| (select.recv(r), r));
        let operation = match wait {
            Wait::Block => select.select(),
            Wait::Poll => select.try_select().ok()?,
            Wait::Until(deadline) => select.select_deadline(deadline).ok()?,
        };
        let received = match rendezvous {
            Some((index, receiver)) if operation.index() == index => operation.recv(receiver),
            _ => {
                debug_assert_eq!(operation.index(), queued);
                operation.recv(&self.queued)
            }
        };
        received.ok()
    }
}

#[cfg(test)]
mod tests;
