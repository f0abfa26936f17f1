//! Table-driven host bridge.
//!
//! Types are declared with [`TypeDescriptor`] builders and grouped into
//! [`ModuleDescriptor`]s. Every member is a Rust closure receiving an
//! [`Invocation`]; overloads are told apart by arity.

use std::sync::Arc;

use atom_ir::{Callback, HostHandle, HostObject, HostType, Items, Signature, Value};
use rustc_hash::FxHashMap;

use super::{CallbackContext, HostBridge, HostCall, MemberFlags, MemberKind, TypeExport};
use crate::HostError;

/// Closure implementing a host member.
pub type MemberFn =
    Arc<dyn Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync>;

/// Whether a member needs a target object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Receiver {
    Static,
    Instance,
}

/// Arguments of one member call.
pub struct Invocation<'a> {
    pub target: Option<&'a Value>,
    pub args: &'a [Value],
    pub ctx: &'a mut dyn CallbackContext,
}

impl Invocation<'_> {
    pub fn arg(&self, index: usize) -> Result<&Value, HostError> {
        self.args.get(index).ok_or(HostError::Argument {
            index,
            expected: "a value",
            found: "nothing".to_string(),
        })
    }

    pub fn integer(&self, index: usize) -> Result<i64, HostError> {
        match self.arg(index)? {
            Value::Integer(n) => Ok(*n),
            other => Err(argument(index, "Int64", other)),
        }
    }

    /// Float argument; integers are widened.
    pub fn float(&self, index: usize) -> Result<f64, HostError> {
        match self.arg(index)? {
            Value::Float(x) => Ok(*x),
            Value::Integer(n) => Ok(widen(*n)),
            other => Err(argument(index, "Double", other)),
        }
    }

    /// Text of a string or symbol argument.
    pub fn text(&self, index: usize) -> Result<String, HostError> {
        match self.arg(index)? {
            value @ (Value::String(_) | Value::Symbol(_)) => Ok(value.to_text()),
            other => Err(argument(index, "String", other)),
        }
    }

    pub fn list(&self, index: usize) -> Result<Items, HostError> {
        match self.arg(index)? {
            Value::List(items) => Ok(items.clone()),
            other => Err(argument(index, "List", other)),
        }
    }

    pub fn callback(&self, index: usize) -> Result<Callback, HostError> {
        match self.arg(index)? {
            Value::Callback(callback) => Ok(callback.clone()),
            other => Err(argument(index, "delegate", other)),
        }
    }

    /// The target of an instance member.
    pub fn this(&self) -> Result<&Value, HostError> {
        self.target.ok_or_else(|| HostError::MissingTarget {
            member: "this".to_string(),
        })
    }

    /// Payload of a host-object target.
    pub fn this_object<T: 'static>(&self, expected: &'static str) -> Result<&T, HostError> {
        let target = self.this()?;
        match target {
            Value::Host(HostHandle::Object(object)) => object
                .downcast_ref::<T>()
                .ok_or_else(|| argument(0, expected, target)),
            other => Err(argument(0, expected, other)),
        }
    }

    /// Call interpreted code.
    pub fn call(&mut self, callback: &Callback, args: Vec<Value>) -> Result<Option<Value>, HostError> {
        self.ctx.call(callback, args).map_err(HostError::from)
    }
}

fn argument(index: usize, expected: &'static str, found: &Value) -> HostError {
    HostError::Argument {
        index,
        expected,
        found: found.describe(),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer arguments to float members widen like the host numeric tower"
)]
fn widen(n: i64) -> f64 {
    n as f64
}

struct Member {
    name: String,
    kind: MemberKind,
    receiver: Receiver,
    /// `None` accepts any number of arguments.
    arity: Option<usize>,
    /// Accessor names hidden from `reference`.
    special: bool,
    body: MemberFn,
    setter: Option<MemberFn>,
}

/// A host type and its members.
pub struct TypeDescriptor {
    ty: HostType,
    members: Vec<Member>,
    delegate: Option<Signature>,
}

impl TypeDescriptor {
    pub fn new(ty: HostType) -> Self {
        TypeDescriptor {
            ty,
            members: Vec::new(),
            delegate: None,
        }
    }

    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    fn push(
        mut self,
        name: &str,
        kind: MemberKind,
        receiver: Receiver,
        arity: Option<usize>,
        body: MemberFn,
    ) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            kind,
            receiver,
            arity,
            special: false,
            body,
            setter: None,
        });
        self
    }

    /// Constructor, bound to the member name `new`.
    #[must_use]
    pub fn constructor<F>(self, arity: Option<usize>, body: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.push(
            "new",
            MemberKind::Constructor,
            Receiver::Static,
            arity,
            Arc::new(body),
        )
    }

    /// Method returning a value.
    #[must_use]
    pub fn method<F>(self, name: &str, receiver: Receiver, arity: Option<usize>, body: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.push(
            name,
            MemberKind::Method { returns: true },
            receiver,
            arity,
            Arc::new(body),
        )
    }

    /// Method returning nothing.
    #[must_use]
    pub fn void_method<F>(
        self,
        name: &str,
        receiver: Receiver,
        arity: Option<usize>,
        body: F,
    ) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.push(
            name,
            MemberKind::Method { returns: false },
            receiver,
            arity,
            Arc::new(body),
        )
    }

    /// Read-only field.
    #[must_use]
    pub fn field<F>(self, name: &str, receiver: Receiver, get: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::Field, receiver, Some(0), Arc::new(get))
    }

    /// Read-only property.
    #[must_use]
    pub fn property<F>(self, name: &str, receiver: Receiver, get: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::Property, receiver, Some(0), Arc::new(get))
    }

    /// Make the field or property `name` writable. The new value is the
    /// single argument.
    #[must_use]
    pub fn setter<F>(mut self, name: &str, set: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        if let Some(member) = self.members.iter_mut().find(|m| {
            m.name == name && matches!(m.kind, MemberKind::Field | MemberKind::Property)
        }) {
            member.setter = Some(Arc::new(set));
        }
        self
    }

    /// Instance event. `add` receives the handler callback as its argument
    /// and is also reachable as the method `add_<name>`.
    #[must_use]
    pub fn event<F>(mut self, name: &str, add: F) -> Self
    where
        F: Fn(Invocation<'_>) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        let add: MemberFn = Arc::new(add);
        self.members.push(Member {
            name: format!("add_{name}"),
            kind: MemberKind::Method { returns: false },
            receiver: Receiver::Instance,
            arity: Some(1),
            special: true,
            body: Arc::clone(&add),
            setter: None,
        });
        self.push(name, MemberKind::Event, Receiver::Instance, Some(1), add)
    }

    /// Declare this type as a delegate type with the given signature.
    #[must_use]
    pub fn delegate(mut self, signature: Signature) -> Self {
        self.delegate = Some(signature);
        self
    }

    /// Pick the overload of a member matching `argc`.
    fn select(
        &self,
        name: &str,
        argc: usize,
        accepts: impl Fn(&Member) -> bool,
    ) -> Result<&Member, HostError> {
        let mut named = self
            .members
            .iter()
            .filter(|m| m.name == name && accepts(m))
            .peekable();
        if named.peek().is_none() {
            return Err(HostError::MissingMember {
                ty: self.ty.name().to_string(),
                member: name.to_string(),
            });
        }
        named
            .find(|m| m.arity.map_or(true, |n| n == argc))
            .ok_or_else(|| HostError::NoOverload {
                ty: self.ty.name().to_string(),
                member: name.to_string(),
                argc,
            })
    }

    fn resolve(&self, name: &str, argc: usize) -> MemberKind {
        let mut named = self.members.iter().filter(|m| m.name == name).peekable();
        let first = named.peek().map(|m| m.kind);
        named
            .find(|m| m.arity.map_or(true, |n| n == argc))
            .map(|m| m.kind)
            .or(first)
            .unwrap_or(MemberKind::Missing)
    }

    fn export(&self) -> TypeExport {
        let mut members: Vec<String> = Vec::new();
        for member in &self.members {
            if member.special
                || matches!(member.kind, MemberKind::Constructor | MemberKind::Event)
            {
                continue;
            }
            if !members.contains(&member.name) {
                members.push(member.name.clone());
            }
        }
        TypeExport {
            ty: self.ty.clone(),
            members,
        }
    }
}

/// A named module of host types.
pub struct ModuleDescriptor {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDescriptor {
            name: name.into(),
            types: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }
}

/// [`HostBridge`] over registered modules.
#[derive(Default)]
pub struct HostRegistry {
    modules: FxHashMap<String, ModuleDescriptor>,
    /// Type index into `modules`: (module name, position).
    index: FxHashMap<HostType, (String, usize)>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.register(module);
        self
    }

    /// Add a module, replacing any module of the same name.
    pub fn register(&mut self, module: ModuleDescriptor) {
        self.index.retain(|_, (owner, _)| owner != module.name());
        for (position, ty) in module.types.iter().enumerate() {
            self.index
                .insert(ty.ty.clone(), (module.name.clone(), position));
        }
        self.modules.insert(module.name.clone(), module);
    }

    fn module(&self, name: &str) -> Result<&ModuleDescriptor, HostError> {
        self.modules
            .get(name)
            .ok_or_else(|| HostError::UnknownModule(name.to_string()))
    }

    fn descriptor(&self, ty: &HostType) -> Option<&TypeDescriptor> {
        let (module, position) = self.index.get(ty)?;
        self.modules.get(module)?.types.get(*position)
    }
}

impl HostBridge for HostRegistry {
    fn types(&self, module: &str, namespaces: &[String]) -> Result<Vec<TypeExport>, HostError> {
        let module = self.module(module)?;
        Ok(module
            .types
            .iter()
            .filter(|ty| namespaces.iter().any(|ns| ns == ty.ty.namespace()))
            .map(TypeDescriptor::export)
            .collect())
    }

    fn find_type(&self, module: &str, name: &str) -> Result<HostType, HostError> {
        self.module(module)?
            .types
            .iter()
            .find(|ty| ty.ty.name() == name || ty.ty.full_name() == name)
            .map(|ty| ty.ty.clone())
            .ok_or_else(|| HostError::UnknownType {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    fn type_of(&self, value: &Value) -> HostType {
        match value {
            Value::Host(HostHandle::Object(object)) => object.host_type().clone(),
            other => builtin_type(other.type_name()),
        }
    }

    fn resolve_member(&self, ty: &HostType, name: &str, argc: usize) -> MemberKind {
        let Some(descriptor) = self.descriptor(ty) else {
            return MemberKind::Missing;
        };
        if name == "new" {
            return if descriptor
                .members
                .iter()
                .any(|m| m.kind == MemberKind::Constructor)
            {
                MemberKind::Constructor
            } else {
                MemberKind::Missing
            };
        }
        descriptor.resolve(name, argc)
    }

    fn invoke(
        &self,
        call: &HostCall,
        ctx: &mut dyn CallbackContext,
    ) -> Result<Option<Value>, HostError> {
        let descriptor = self
            .descriptor(&call.ty)
            .ok_or_else(|| HostError::UnknownType {
                module: call.ty.module().to_string(),
                name: call.ty.name().to_string(),
            })?;
        let argc = call.args.len();
        let flags = call.flags;

        let (member, body) = if flags.contains(MemberFlags::CREATE_INSTANCE) {
            let member = descriptor.select("new", argc, |m| m.kind == MemberKind::Constructor)?;
            (member, &member.body)
        } else if flags.intersects(MemberFlags::GET_FIELD | MemberFlags::GET_PROPERTY) {
            let member = descriptor.select(&call.member, argc, is_data)?;
            (member, &member.body)
        } else if flags.intersects(MemberFlags::SET_FIELD | MemberFlags::SET_PROPERTY) {
            let member = descriptor.select(&call.member, 0, is_data)?;
            let setter = member.setter.as_ref().ok_or_else(|| HostError::MissingMember {
                ty: call.ty.name().to_string(),
                member: format!("set_{}", call.member),
            })?;
            if argc != 1 {
                return Err(HostError::NoOverload {
                    ty: call.ty.name().to_string(),
                    member: call.member.clone(),
                    argc,
                });
            }
            (member, setter)
        } else {
            let member = descriptor.select(&call.member, argc, |m| {
                matches!(m.kind, MemberKind::Method { .. })
            })?;
            (member, &member.body)
        };

        if member.receiver == Receiver::Instance && call.target.is_none() {
            return Err(HostError::MissingTarget {
                member: call.member.clone(),
            });
        }
        tracing::trace!(call = %call.signature(), "host call");
        body(Invocation {
            target: call.target.as_ref(),
            args: &call.args,
            ctx,
        })
    }

    fn convert(&self, value: &Value, ty: &HostType) -> Result<Value, HostError> {
        if ty.name() == "Object" || self.type_of(value) == *ty {
            return Ok(value.clone());
        }
        Err(HostError::Conversion {
            value: value.to_string(),
            target: ty.name().to_string(),
        })
    }

    fn delegate_signature(&self, ty: &HostType) -> Option<Signature> {
        self.descriptor(ty)?.delegate.clone()
    }
}

fn is_data(member: &Member) -> bool {
    matches!(member.kind, MemberKind::Field | MemberKind::Property)
}

/// Host type of a value the interpreter represents natively.
pub(crate) fn builtin_type(name: &str) -> HostType {
    HostType::new(super::std_module::MODULE, super::std_module::NAMESPACE, name)
}

/// Wrap a payload as a host object value.
pub(crate) fn object(ty: HostType, data: impl atom_ir::HostData) -> Value {
    Value::host_object(HostObject::new(ty, data))
}

#[cfg(test)]
mod tests;
