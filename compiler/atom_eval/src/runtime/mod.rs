//! The public runtime: an interpreter behind a mutex, a run thread, and the
//! session state an observer talks to while a run is in progress.

mod builder;

pub use builder::{RuntimeBuilder, RuntimeConfig, DEFAULT_MAX_CALL_DEPTH};

use std::path::Path;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use atom_ir::{Callback, CallbackError, CallbackPort, Items, Value};
use crossbeam::channel::{self, RecvTimeoutError};
use parking_lot::{Mutex, MutexGuard};

use crate::dispatch::Dispatch;
use crate::session::{PendingCallback, Session};
use crate::{DebugSnapshot, EvalError, Interpreter, Observer, RuntimeError, RuntimeEvent};

/// How often a thread waiting on a queued callback retries serving it
/// itself, in case the run ended before picking it up.
const CALLBACK_POLL: Duration = Duration::from_millis(10);

/// Name of the evaluation thread.
const THREAD_NAME: &str = "atom-eval";

/// State shared by a [`Runtime`], its run thread and its callbacks.
pub(crate) struct Shared {
    interpreter: Mutex<Interpreter>,
    session: Arc<Session>,
    config: RuntimeConfig,
}

impl Shared {
    fn run(&self, code: Option<String>, evaluate: bool) -> Result<(), EvalError> {
        let span = tracing::debug_span!("run", evaluate);
        let _guard = span.enter();
        tracing::debug!("run started");

        let mut interpreter = self.interpreter.lock();
        let previous = self.session.enter_evaluator();
        if let Some(code) = code {
            interpreter.set_code(code);
        }
        interpreter.reset();
        let result = interpreter.load_root().map(|_| ()).and_then(|()| {
            if evaluate {
                interpreter.evaluate_root()
            } else {
                Ok(())
            }
        });
        self.session.finish();
        interpreter.publish();
        interpreter.service_callbacks();
        self.session.leave_evaluator(previous);
        let dispatch = interpreter.dispatch().clone();
        drop(interpreter);

        match &result {
            Ok(()) => tracing::debug!("run finished"),
            Err(error) => tracing::debug!(%error, "run failed"),
        }
        if evaluate || result.is_err() {
            dispatch.notify(RuntimeEvent::Terminating(result.as_ref().err().cloned()));
        }
        result
    }

    fn serve_here(
        &self,
        interpreter: &mut Interpreter,
        callback: &Callback,
        args: Vec<Value>,
    ) -> Result<Option<Value>, CallbackError> {
        let previous = self.session.enter_evaluator();
        let result = interpreter.call_inline(callback, args);
        self.session.leave_evaluator(previous);
        result.map_err(|error| CallbackError::Failed(error.to_string()))
    }
}

impl CallbackPort for Shared {
    fn call(&self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, CallbackError> {
        if self.session.on_evaluator_thread() {
            return Err(CallbackError::Reentrant);
        }
        if self.session.gate.is_paused() {
            return Err(CallbackError::Paused);
        }
        if let Some(mut interpreter) = self.interpreter.try_lock() {
            tracing::trace!("callback on the calling thread");
            return self.serve_here(&mut interpreter, callback, args);
        }

        tracing::trace!("callback queued for the evaluation thread");
        let (reply, result) = channel::bounded(1);
        self.session
            .request_sender()
            .send(PendingCallback {
                callback: callback.clone(),
                args,
                reply,
            })
            .map_err(|_| CallbackError::Detached)?;
        loop {
            match result.recv_timeout(CALLBACK_POLL) {
                Ok(reply) => {
                    return reply.map_err(|error| CallbackError::Failed(error.to_string()))
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(mut interpreter) = self.interpreter.try_lock() {
                        let previous = self.session.enter_evaluator();
                        interpreter.service_callbacks();
                        self.session.leave_evaluator(previous);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(CallbackError::Detached),
            }
        }
    }
}

/// An Atom runtime.
///
/// Holds one interpreter. [`Runtime::run`] evaluates the current code on a
/// new thread; while it runs, the paired [`Observer`] receives
/// notifications and the runtime can be inspected with
/// [`Runtime::snapshot`] and resumed with [`Runtime::resume`].
///
/// ```no_run
/// use atom_eval::{Runtime, RuntimeEvent};
///
/// let (runtime, observer) = Runtime::new()?;
/// runtime.load("1 2 add output")?;
/// runtime.run()?;
/// while let Some(event) = observer.next_event() {
///     if let RuntimeEvent::Terminating(_) = event {
///         break;
///     }
/// }
/// # Ok::<(), atom_eval::RuntimeError>(())
/// ```
pub struct Runtime {
    shared: Arc<Shared>,
}

impl Runtime {
    /// A runtime with the default configuration.
    pub fn new() -> Result<(Runtime, Observer), RuntimeError> {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn with_config(config: RuntimeConfig) -> Result<(Runtime, Observer), RuntimeError> {
        let (dispatch, observer) = Dispatch::channel(config.dispatch);
        let session = Arc::new(Session::new());
        let interpreter = Interpreter::assemble(&config, dispatch, Arc::clone(&session))?;
        let shared = Arc::new(Shared {
            interpreter: Mutex::new(interpreter),
            session,
            config,
        });
        let port: Weak<dyn CallbackPort> = Arc::downgrade(&shared) as Weak<Shared>;
        shared.interpreter.lock().attach(port);
        Ok((Runtime { shared }, observer))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.shared.config
    }

    /// The code named by `code_or_path`: the file under the base directory
    /// when it exists, otherwise the text itself.
    pub fn code(&self, code_or_path: &str) -> Result<String, EvalError> {
        read_code(&self.shared.config.base_dir, code_or_path)
    }

    /// Make `code_or_path` the current code and parse it without evaluating.
    pub fn load(&self, code_or_path: &str) -> Result<Items, RuntimeError> {
        if self.shared.session.is_running() {
            return Err(RuntimeError::AlreadyRunning);
        }
        let code = self.code(code_or_path)?;
        let mut interpreter = self.shared.interpreter.lock();
        interpreter.set_code(code);
        let root = interpreter.load_root()?.clone();
        interpreter.publish();
        Ok(root)
    }

    /// Evaluate the current code on the evaluation thread.
    pub fn run(&self) -> Result<JoinHandle<Result<(), EvalError>>, RuntimeError> {
        self.start(None, true)
    }

    /// Replace the current code and run it; with `evaluate` false the code
    /// is only parsed.
    pub fn run_code(
        &self,
        code_or_path: &str,
        evaluate: bool,
    ) -> Result<JoinHandle<Result<(), EvalError>>, RuntimeError> {
        let code = self.code(code_or_path)?;
        self.start(Some(code), evaluate)
    }

    /// Evaluate the current code on the calling thread.
    ///
    /// A `break` blocks this thread until another thread resumes, and in
    /// observer mode notifications wait for the observer.
    pub fn run_blocking(&self) -> Result<(), RuntimeError> {
        if !self.shared.session.try_start() {
            return Err(RuntimeError::AlreadyRunning);
        }
        self.shared.run(None, true).map_err(RuntimeError::from)
    }

    fn start(
        &self,
        code: Option<String>,
        evaluate: bool,
    ) -> Result<JoinHandle<Result<(), EvalError>>, RuntimeError> {
        if !self.shared.session.try_start() {
            return Err(RuntimeError::AlreadyRunning);
        }
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || shared.run(code, evaluate))
            .map_err(|error| {
                self.shared.session.finish();
                RuntimeError::Spawn(error.to_string())
            })
    }

    /// Continue a paused run. With `step_next` the run pauses again before
    /// the next element. Returns whether the run was paused.
    pub fn resume(&self, step_next: bool) -> bool {
        let resumed = self.shared.session.gate.resume(step_next);
        tracing::debug!(step_next, resumed, "resume");
        resumed
    }

    pub fn is_paused(&self) -> bool {
        self.shared.session.gate.is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.shared.session.is_running()
    }

    /// Current state: live when the interpreter is idle, otherwise the last
    /// snapshot the run published.
    pub fn snapshot(&self) -> DebugSnapshot {
        match self.shared.interpreter.try_lock() {
            Some(interpreter) => interpreter.snapshot(),
            None => self.shared.session.published(),
        }
    }

    /// Lock the interpreter for direct use. Blocks while a run is active.
    pub fn interpreter(&self) -> MutexGuard<'_, Interpreter> {
        self.shared.interpreter.lock()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.shared.config)
            .field("running", &self.is_running())
            .field("paused", &self.is_paused())
            .finish()
    }
}

/// Read `base_dir/code_or_path` if it is a file; otherwise the argument is
/// the code.
pub(crate) fn read_code(base_dir: &Path, code_or_path: &str) -> Result<String, EvalError> {
    let path = base_dir.join(code_or_path);
    if !path.is_file() {
        return Ok(code_or_path.to_string());
    }
    std::fs::read_to_string(&path).map_err(|error| EvalError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests;
