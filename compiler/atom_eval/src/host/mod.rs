//! Host interop.
//!
//! The interpreter reaches host code only through [`HostBridge`], so the
//! backend is swappable. [`HostRegistry`] is the provided backend: a
//! reflection-like table of modules, namespaces and types whose members are
//! Rust closures. [`std_module`] fills it with the standard vocabulary.

mod registry;
mod std_module;

pub(crate) use registry::{builtin_type, object};
pub use registry::{
    HostRegistry, Invocation, MemberFn, ModuleDescriptor, Receiver, TypeDescriptor,
};
pub use std_module::std_module;

use atom_ir::{Callback, HostType, Signature, Value};

use crate::{EvalError, HostError};

bitflags::bitflags! {
    /// Member lookup flags passed to `invoke`.
    ///
    /// Bit values match the host binding-flag and member-type encodings, so
    /// programs can pass the integers the `BindingFlags` type exposes.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct MemberFlags: u32 {
        const INSTANCE = 4;
        const STATIC = 8;
        const PUBLIC = 16;
        const INVOKE_METHOD = 256;
        const CREATE_INSTANCE = 512;
        const GET_FIELD = 1024;
        const SET_FIELD = 2048;
        const GET_PROPERTY = 4096;
        const SET_PROPERTY = 8192;
    }
}

impl MemberFlags {
    /// The flags `execute` uses for a member of the given kind.
    pub fn for_access(kind: MemberKind, receiver: Receiver, argc: usize) -> MemberFlags {
        let binding = MemberFlags::PUBLIC
            | match receiver {
                Receiver::Static => MemberFlags::STATIC,
                Receiver::Instance => MemberFlags::INSTANCE,
            };
        let access = match kind {
            MemberKind::Constructor => MemberFlags::CREATE_INSTANCE,
            MemberKind::Field if argc == 0 => MemberFlags::GET_FIELD,
            MemberKind::Field => MemberFlags::SET_FIELD,
            MemberKind::Property if argc == 0 => MemberFlags::GET_PROPERTY,
            MemberKind::Property => MemberFlags::SET_PROPERTY,
            MemberKind::Method { .. } | MemberKind::Event | MemberKind::Missing => {
                MemberFlags::INVOKE_METHOD
            }
        };
        binding | access
    }
}

/// What a member name resolves to on a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    Method { returns: bool },
    Field,
    Property,
    Event,
    Missing,
}

/// A type imported by `reference`, with its bindable member names.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeExport {
    pub ty: HostType,
    pub members: Vec<String>,
}

/// A resolved host member call.
#[derive(Clone, Debug, PartialEq)]
pub struct HostCall {
    pub ty: HostType,
    pub member: String,
    pub flags: MemberFlags,
    /// Receiver of instance members.
    pub target: Option<Value>,
    pub args: Vec<Value>,
}

impl HostCall {
    /// `Type.member(arg, arg)`, used in error messages.
    pub fn signature(&self) -> String {
        call_signature(self.ty.name(), &self.member, &self.args)
    }
}

pub(crate) fn call_signature(type_name: &str, member: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{type_name}.{member}({})", args.join(", "))
}

/// Calls back into interpreted code from inside a host call.
pub trait CallbackContext {
    fn call(&mut self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, EvalError>;
}

/// The host side of the interpreter.
pub trait HostBridge: Send + Sync {
    /// Types exported by `module` under any of `namespaces`.
    fn types(&self, module: &str, namespaces: &[String]) -> Result<Vec<TypeExport>, HostError>;

    fn find_type(&self, module: &str, name: &str) -> Result<HostType, HostError>;

    /// Host type of a runtime value.
    fn type_of(&self, value: &Value) -> HostType;

    fn resolve_member(&self, ty: &HostType, name: &str, argc: usize) -> MemberKind;

    fn invoke(
        &self,
        call: &HostCall,
        ctx: &mut dyn CallbackContext,
    ) -> Result<Option<Value>, HostError>;

    /// Convert to a type the interpreter does not know natively.
    fn convert(&self, value: &Value, ty: &HostType) -> Result<Value, HostError>;

    /// Parameter and return types of a delegate type.
    fn delegate_signature(&self, ty: &HostType) -> Option<Signature>;
}

#[cfg(test)]
mod tests;
