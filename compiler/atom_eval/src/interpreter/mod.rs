//! The evaluator.
//!
//! Code is data: a program is an [`Items`] list and evaluation walks it one
//! element at a time. Symbols resolve through put-bindings (locals of the
//! innermost activation) and then set-bindings (globals holding primitives,
//! operators and user definitions). Everything else is pushed.
//!
//! # Modules
//!
//! - `primitives`: the built-in words
//! - `interop`: `execute`, `invoke`, `reference`, callbacks and host calls
//! - `pragmas`: lex-time `load-file` and `reference`
//! - `reflection`: the `runtime` object
//! - `scope_guard`: RAII put-scope used when a set-binding list runs

mod interop;
mod pragmas;
mod primitives;
mod reflection;
mod scope_guard;

pub use scope_guard::PutScope;

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use atom_ir::{
    Callback, CallbackError, CallbackPort, HostType, Items, NativeAction, OperatorKind, Primitive,
    Symbol, Value,
};
use atom_lexer::{Lexer, Syntax};
use atom_stack::ensure_sufficient_stack;

use crate::dispatch::Dispatch;
use crate::host::{CallbackContext, HostBridge};
use crate::operators::{binary, convert_builtin, unary};
use crate::runtime::{RuntimeConfig, Shared};
use crate::session::{PendingCallback, Session};
use crate::{
    CallEnvironmentStack, DebugSnapshot, EvalError, FrameSnapshot, Observer, OperandStack,
    RuntimeEvent, ScopedBindings,
};

/// Stack-based evaluator with scoped bindings and host interop.
pub struct Interpreter {
    stack: OperandStack,
    set_bindings: ScopedBindings,
    put_bindings: ScopedBindings,
    frames: CallEnvironmentStack,
    bridge: Arc<dyn HostBridge>,
    dispatch: Dispatch,
    session: Arc<Session>,
    port: Weak<dyn CallbackPort>,
    syntax: Syntax,
    base_dir: PathBuf,
    max_load_depth: usize,
    root: Items,
    code: String,
    /// Set while serving a callback for another thread: host calls run
    /// here, notifications are queued and pauses are skipped.
    force_inline: bool,
}

impl Interpreter {
    /// A standalone interpreter and the observer of its notifications.
    ///
    /// Callbacks it creates are detached: host code can only call them
    /// through the callback context of a host call.
    pub fn new(config: &RuntimeConfig) -> Result<(Interpreter, Observer), EvalError> {
        let (dispatch, observer) = Dispatch::channel(config.dispatch);
        let interpreter = Self::assemble(config, dispatch, Arc::new(Session::new()))?;
        Ok((interpreter, observer))
    }

    pub(crate) fn assemble(
        config: &RuntimeConfig,
        dispatch: Dispatch,
        session: Arc<Session>,
    ) -> Result<Self, EvalError> {
        let port: Weak<dyn CallbackPort> = Weak::<Shared>::new();
        let mut interpreter = Interpreter {
            stack: OperandStack::new(),
            set_bindings: ScopedBindings::new(),
            put_bindings: ScopedBindings::new(),
            frames: CallEnvironmentStack::new(config.max_call_depth),
            bridge: Arc::clone(&config.bridge),
            dispatch,
            session,
            port,
            syntax: config.syntax.clone(),
            base_dir: config.base_dir.clone(),
            max_load_depth: config.max_load_depth,
            root: Items::new(),
            code: String::new(),
            force_inline: false,
        };
        interpreter.register_words()?;
        for (module, namespaces) in &config.references {
            interpreter.reference(module, namespaces)?;
        }
        Ok(interpreter)
    }

    /// Bind primitives, operators, the boolean constants and `runtime`.
    fn register_words(&mut self) -> Result<(), EvalError> {
        for primitive in Primitive::ALL {
            self.set_bindings.set(
                Symbol::new(primitive.word()),
                Value::Action(NativeAction::Primitive(primitive)),
            );
        }
        for op in OperatorKind::ALL {
            let action = operator_factory(&Value::symbol(op.word()), op.arity())?;
            self.set_bindings.set(Symbol::new(op.word()), Value::Action(action));
        }
        self.set_bindings.set(Symbol::new("true"), Value::Boolean(true));
        self.set_bindings.set(Symbol::new("false"), Value::Boolean(false));
        self.register_runtime();
        Ok(())
    }

    /// Route callbacks created from now on through `port`.
    pub(crate) fn attach(&mut self, port: Weak<dyn CallbackPort>) {
        self.port = port;
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    pub fn set_bindings(&self) -> &ScopedBindings {
        &self.set_bindings
    }

    pub fn put_bindings(&self) -> &ScopedBindings {
        &self.put_bindings
    }

    pub fn frames(&self) -> &CallEnvironmentStack {
        &self.frames
    }

    /// The parsed program of the current run.
    pub fn root(&self) -> &Items {
        &self.root
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Clear per-run state: operand stack, frames and put-bindings.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.frames.clear();
        self.put_bindings.reset();
        self.session.gate.reset();
    }

    /// Tokenize and parse `source`, running its pragmas.
    pub fn parse(&mut self, source: &str) -> Result<Items, EvalError> {
        let syntax = self.syntax.clone();
        let max_load_depth = self.max_load_depth;
        let mut pragmas = pragmas::Pragmas::new(self);
        let tokens = Lexer::new(&syntax)
            .max_load_depth(max_load_depth)
            .tokenize(source, &mut pragmas)?;
        Ok(atom_parse::parse_items(tokens, &syntax))
    }

    /// Parse the current code into the root list.
    pub fn load_root(&mut self) -> Result<&Items, EvalError> {
        let code = std::mem::take(&mut self.code);
        let parsed = self.parse(&code);
        self.code = code;
        self.root = parsed?;
        Ok(&self.root)
    }

    /// Evaluate the root list.
    pub fn evaluate_root(&mut self) -> Result<(), EvalError> {
        let root = self.root.clone();
        self.evaluate_items(&root)
    }

    /// Parse and evaluate `source` as the current program.
    pub fn run_source(&mut self, source: &str) -> Result<(), EvalError> {
        self.set_code(source);
        self.load_root()?;
        self.evaluate_root()
    }

    /// Evaluate a value: lists are walked, anything else is a one-element list.
    pub fn evaluate(&mut self, value: &Value) -> Result<(), EvalError> {
        match value {
            Value::List(items) => self.evaluate_items(items),
            other => self.evaluate_items(&Items::single(other.clone())),
        }
    }

    fn evaluate_items(&mut self, items: &Items) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| {
            let put_scope = self.put_bindings.depth().saturating_sub(1);
            self.frames.push(items.clone(), put_scope)?;
            // Indexed so a body that edits its own list sees the edit.
            let mut index = 0;
            while let Some(element) = items.get(index) {
                self.frames.set_cursor(element.clone());
                self.service_callbacks();
                if !self.force_inline && self.session.gate.take_step() {
                    self.pause(RuntimeEvent::Stepping);
                }
                self.resolve(&element)?;
                index += 1;
            }
            self.frames.pop();
            Ok(())
        })
    }

    fn resolve(&mut self, element: &Value) -> Result<(), EvalError> {
        tracing::trace!(%element, "element");
        let Value::Symbol(symbol) = element else {
            self.stack.push(element.clone());
            return Ok(());
        };
        if let Some(value) = self.put_bindings.get(symbol.as_str()) {
            self.stack.push(value.clone());
            return Ok(());
        }
        match self.set_bindings.get(symbol.as_str()).cloned() {
            Some(Value::Action(action)) => self.perform(&action),
            Some(Value::List(body)) => {
                let mut scoped = self.put_scope();
                scoped.evaluate_items(&body)
            }
            Some(other) => self.evaluate(&other),
            None => {
                self.stack.push(element.clone());
                Ok(())
            }
        }
    }

    fn perform(&mut self, action: &NativeAction) -> Result<(), EvalError> {
        match action {
            NativeAction::Primitive(primitive) => self.primitive(*primitive),
            NativeAction::Operator(op) => self.apply_operator(*op),
            NativeAction::Convert(ty) => {
                let value = self.stack.pop()?;
                let converted = self.convert(&value, ty)?;
                self.stack.push(converted);
                Ok(())
            }
        }
    }

    /// Binary words compute `b op a` where `a` is on top.
    fn apply_operator(&mut self, op: OperatorKind) -> Result<(), EvalError> {
        let result = if op.arity() == 1 {
            unary(op, &self.stack.pop()?)?
        } else {
            let a = self.stack.pop()?;
            let b = self.stack.pop()?;
            binary(op, &b, &a)?
        };
        self.stack.push(result);
        Ok(())
    }

    /// Convert natively when possible, otherwise through the host.
    pub(crate) fn convert(&self, value: &Value, ty: &HostType) -> Result<Value, EvalError> {
        if let Some(converted) = convert_builtin(value, ty.name()) {
            return converted;
        }
        self.bridge
            .convert(value, ty)
            .map_err(|cause| EvalError::Host {
                signature: format!("convert-to-{ty}({value})"),
                cause,
            })
    }

    /// Send a notification, queueing it while serving another thread.
    fn emit(&self, event: RuntimeEvent) -> bool {
        if self.force_inline {
            self.dispatch.queue(event)
        } else {
            self.dispatch.notify(event)
        }
    }

    /// Publish a snapshot, notify, and wait for the observer to resume.
    fn pause(&mut self, event: RuntimeEvent) {
        if self.force_inline {
            tracing::warn!(?event, "pause inside a callback served for another thread ignored");
            return;
        }
        tracing::debug!(?event, "pausing");
        let mut snapshot = self.snapshot();
        snapshot.paused = true;
        let session = Arc::clone(&self.session);
        let dispatch = self.dispatch.clone();
        session.gate.pause(|| {
            session.publish(snapshot);
            let delivered = dispatch.notify(event);
            if !delivered {
                tracing::warn!("no observer to resume a pause; continuing");
            }
            delivered
        });
        tracing::debug!("resumed");
    }

    /// Copy of the current state for the debugger.
    pub fn snapshot(&self) -> DebugSnapshot {
        let frames = self
            .frames
            .innermost_first()
            .map(|frame| {
                let mut put_bindings: Vec<(Symbol, Value)> = self
                    .put_bindings
                    .scope(frame.put_scope)
                    .map(|scope| {
                        scope
                            .iter()
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                put_bindings.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
                FrameSnapshot {
                    items: frame.items.clone(),
                    cursor: frame.cursor.clone(),
                    put_bindings,
                }
            })
            .collect();
        DebugSnapshot {
            stack: self.stack.as_slice().to_vec(),
            frames,
            root: self.root.clone(),
            running: self.session.is_running(),
            paused: self.session.gate.is_paused(),
        }
    }

    pub(crate) fn publish(&self) {
        self.session.publish(self.snapshot());
    }

    pub(crate) fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Serve callbacks queued by other threads.
    pub(crate) fn service_callbacks(&mut self) {
        if self.session.requests().is_empty() {
            return;
        }
        let requests = self.session.requests().clone();
        while let Ok(request) = requests.try_recv() {
            self.serve(request);
        }
    }

    fn serve(&mut self, request: PendingCallback) {
        let result = self.call_inline(&request.callback, request.args);
        // The caller may have given up waiting.
        let _ = request.reply.send(result);
    }

    /// Run a callback with host calls forced onto this thread.
    pub(crate) fn call_inline(
        &mut self,
        callback: &Callback,
        args: Vec<Value>,
    ) -> Result<Option<Value>, EvalError> {
        let previous = std::mem::replace(&mut self.force_inline, true);
        let result = self.call_callback(callback, args);
        self.force_inline = previous;
        result
    }

    /// Push the arguments, evaluate the body, pop and convert the result.
    ///
    /// On error the frames the callback pushed are dropped so the caller's
    /// frame stack is intact.
    pub(crate) fn call_callback(
        &mut self,
        callback: &Callback,
        args: Vec<Value>,
    ) -> Result<Option<Value>, EvalError> {
        let expected = callback.signature().arity();
        if args.len() != expected {
            return Err(CallbackError::Arity {
                expected,
                got: args.len(),
            }
            .into());
        }
        let depth = self.frames.depth();
        let result = self.run_callback(callback, args);
        if result.is_err() {
            self.frames.truncate(depth);
        }
        result
    }

    fn run_callback(
        &mut self,
        callback: &Callback,
        args: Vec<Value>,
    ) -> Result<Option<Value>, EvalError> {
        for arg in args {
            self.stack.push(arg);
        }
        self.evaluate_items(callback.body())?;
        match &callback.signature().returns {
            Some(ty) if ty.name() != "Void" => {
                let value = self.stack.pop()?;
                self.convert(&value, ty).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl CallbackContext for Interpreter {
    fn call(&mut self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, EvalError> {
        self.call_callback(callback, args)
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("stack", &self.stack)
            .field("frames", &self.frames.depth())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Operator action for an identifier (word or host expression-kind name)
/// of the given arity.
pub(crate) fn operator_factory(identifier: &Value, arity: usize) -> Result<NativeAction, EvalError> {
    let name = match identifier {
        Value::Symbol(_) | Value::String(_) => identifier.to_text(),
        other => return Err(EvalError::type_mismatch("operator name", other)),
    };
    match OperatorKind::from_identifier(&name) {
        Some(op) if op.arity() == arity => Ok(NativeAction::Operator(op)),
        _ => Err(EvalError::UnknownOperator(format!("{name}/{arity}"))),
    }
}
