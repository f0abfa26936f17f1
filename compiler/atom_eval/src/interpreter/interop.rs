//! Host interop words and host-call marshaling.

use std::sync::Arc;

use atom_ir::{Callback, HostHandle, HostType, Signature, Symbol, Value};
use crossbeam::channel;
use rustc_hash::FxHashSet;

use super::reflection::is_runtime;
use super::Interpreter;
use crate::dispatch::{HostJob, RemoteCallbacks};
use crate::host::{builtin_type, call_signature, HostCall, MemberFlags, MemberKind, Receiver};
use crate::{EvalError, HostError};

/// Member name `execute` treats as the constructor.
const NEW: &str = "new";

impl Interpreter {
    /// `type-or-target [flag] [(args)] member execute`
    pub(super) fn execute(&mut self) -> Result<(), EvalError> {
        let member = self.stack.pop_text()?;
        let argc = if matches!(self.stack.peek()?, Value::List(_)) {
            self.evaluate_and_split()?;
            self.stack.pop_count()?
        } else {
            0
        };
        let args = self.stack.pop_n(argc)?;
        let (subject, force_instance) = match self.stack.pop()? {
            Value::Boolean(force) => (self.stack.pop()?, force),
            other => (other, false),
        };
        if is_runtime(&subject) {
            let value = self.reflect(&member, &args)?;
            self.stack.push(value);
            return Ok(());
        }
        let static_type = if force_instance {
            None
        } else {
            subject.as_host_type().cloned()
        };
        let (ty, target, receiver) = match static_type {
            Some(ty) => (ty, None, Receiver::Static),
            None => (self.bridge.type_of(&subject), Some(subject), Receiver::Instance),
        };

        let kind = if member == NEW {
            MemberKind::Constructor
        } else {
            self.bridge.resolve_member(&ty, &member, args.len())
        };
        let (name, target, returns) = match kind {
            MemberKind::Constructor => (NEW.to_string(), None, true),
            MemberKind::Method { returns } => (member, target, returns),
            MemberKind::Field | MemberKind::Property => (member, target, args.is_empty()),
            MemberKind::Event => (format!("add_{member}"), target, false),
            MemberKind::Missing => {
                return Err(EvalError::Host {
                    signature: call_signature(ty.name(), &member, &args),
                    cause: HostError::MissingMember {
                        ty: ty.name().to_string(),
                        member,
                    },
                })
            }
        };
        let call = HostCall {
            flags: MemberFlags::for_access(kind, receiver, args.len()),
            ty,
            member: name,
            target,
            args,
        };
        let result = self.call_host(call)?;
        if returns {
            if let Some(value) = result {
                self.stack.push(value);
            }
        }
        Ok(())
    }

    /// `[target] args... count module type member member-type member-kind invoke`
    pub(super) fn invoke(&mut self) -> Result<(), EvalError> {
        let kind = self.pop_flags()?;
        let binding = self.pop_flags()?;
        let member = self.stack.pop_text()?;
        let type_name = self.stack.pop_text()?;
        let module = self.stack.pop_text()?;
        let argc = self.stack.pop_count()?;
        let args = self.stack.pop_n(argc)?;
        let flags = kind | binding | MemberFlags::PUBLIC;
        let target = if flags.contains(MemberFlags::INSTANCE)
            && !flags.contains(MemberFlags::CREATE_INSTANCE)
        {
            Some(self.stack.pop()?)
        } else {
            None
        };
        let ty = self
            .bridge
            .find_type(&module, &type_name)
            .map_err(|cause| EvalError::Host {
                signature: call_signature(&type_name, &member, &args),
                cause,
            })?;
        let call = HostCall {
            ty,
            member,
            flags,
            target,
            args,
        };
        if let Some(value) = self.call_host(call)? {
            self.stack.push(value);
        }
        Ok(())
    }

    fn pop_flags(&mut self) -> Result<MemberFlags, EvalError> {
        let bits = self.stack.pop_integer()?;
        u32::try_from(bits)
            .map(MemberFlags::from_bits_truncate)
            .map_err(|_| EvalError::type_mismatch("member flags", &Value::Integer(bits)))
    }

    /// `module namespaces reference`
    pub(super) fn reference_primitive(&mut self) -> Result<(), EvalError> {
        let namespaces: Vec<String> = match self.stack.pop()? {
            Value::List(items) => items.to_vec().iter().map(Value::to_text).collect(),
            value @ (Value::Symbol(_) | Value::String(_)) => vec![value.to_text()],
            other => return Err(EvalError::type_mismatch("namespaces", &other)),
        };
        let module = self.stack.pop_text()?;
        self.reference(&module, &namespaces)
    }

    /// Bind the types of `namespaces` and their unbound member names.
    ///
    /// Type names always rebind. A member name is bound to
    /// `("member" execute)` only when nothing else holds that word.
    pub(crate) fn reference(&mut self, module: &str, namespaces: &[String]) -> Result<(), EvalError> {
        let exports = self
            .bridge
            .types(module, namespaces)
            .map_err(|cause| EvalError::Host {
                signature: format!("reference({module}, {})", namespaces.join(" ")),
                cause,
            })?;
        tracing::debug!(module, ?namespaces, types = exports.len(), "reference");
        let mut members = FxHashSet::default();
        for export in exports {
            self.set_bindings
                .set(Symbol::new(export.ty.name()), Value::host_type(export.ty));
            members.extend(export.members);
        }
        for name in members {
            if !self.set_bindings.contains(&name) {
                let body = Value::list(vec![
                    Value::string(name.as_str()),
                    Value::symbol("execute"),
                ]);
                self.set_bindings.set(Symbol::new(name), body);
            }
        }
        Ok(())
    }

    /// `(body) create-event-handler`: a (sender, arguments) callback.
    pub(super) fn create_event_handler(&mut self) -> Result<(), EvalError> {
        let body = self.stack.pop_list()?;
        let signature = Signature {
            params: vec![builtin_type("Object"), builtin_type("Object")],
            returns: None,
        };
        self.stack
            .push(Value::Callback(Callback::new(body, signature, self.port.clone())));
        Ok(())
    }

    /// `(body) DelegateType create-delegate` or
    /// `(body) ReturnType (ParamTypes...) create-delegate`.
    pub(super) fn create_delegate(&mut self) -> Result<(), EvalError> {
        let signature = if matches!(self.stack.peek()?, Value::Host(HostHandle::Type(_))) {
            let ty = self.stack.pop_host_type()?;
            self.bridge
                .delegate_signature(&ty)
                .ok_or_else(|| EvalError::type_mismatch("delegate type", &Value::host_type(ty)))?
        } else {
            self.evaluate_and_split()?;
            let count = self.stack.pop_count()?;
            let params = self
                .stack
                .pop_n(count)?
                .iter()
                .map(|value| {
                    value
                        .as_host_type()
                        .cloned()
                        .ok_or_else(|| EvalError::type_mismatch("parameter type", value))
                })
                .collect::<Result<Vec<HostType>, EvalError>>()?;
            let returns = self.stack.pop_host_type()?;
            Signature {
                params,
                returns: (returns.name() != "Void").then_some(returns),
            }
        };
        let body = self.stack.pop_list()?;
        self.stack
            .push(Value::Callback(Callback::new(body, signature, self.port.clone())));
        Ok(())
    }

    /// Run a host call, marshaled to the observer in observer mode.
    fn call_host(&mut self, call: HostCall) -> Result<Option<Value>, EvalError> {
        let signature = call.signature();
        tracing::trace!(%signature, "host call");
        self.marshal(call)
            .map_err(|cause| EvalError::Host { signature, cause })
    }

    fn marshal(&mut self, call: HostCall) -> Result<Option<Value>, HostError> {
        let bridge = Arc::clone(&self.bridge);
        if self.force_inline {
            return bridge.invoke(&call, self);
        }
        let (reply, result) = channel::bounded(1);
        let job = HostJob {
            bridge,
            call,
            callbacks: RemoteCallbacks {
                requests: self.session.request_sender(),
            },
            reply,
        };
        if let Err(job) = self.dispatch.submit(job) {
            return job.bridge.invoke(&job.call, self);
        }
        let requests = self.session.requests().clone();
        loop {
            crossbeam::select! {
                recv(result) -> reply => {
                    return reply.unwrap_or_else(|_| {
                        Err(HostError::Failed("observer dropped the host call".to_string()))
                    });
                }
                recv(requests) -> request => {
                    if let Ok(request) = request {
                        self.serve(request);
                    }
                }
            }
        }
    }
}
