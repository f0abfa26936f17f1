//! Opaque host handles.
//!
//! The interpreter never looks inside host objects. It only carries them on
//! the stack, prints them, and hands them back to the host bridge, which
//! downcasts the payload through [`HostData::as_any`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A host type, identified by module, namespace and type name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HostType {
    module: Arc<str>,
    namespace: Arc<str>,
    name: Arc<str>,
}

impl HostType {
    pub fn new(
        module: impl Into<Arc<str>>,
        namespace: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> Self {
        HostType {
            module: module.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The module (assembly) that declares the type.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The short type name, which is also the word the type is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Namespace.Name`.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({}:{})", self.module, self.full_name())
    }
}

/// Payload of a host object.
pub trait HostData: Send + Sync + fmt::Debug + 'static {
    /// Printed form used by `output`, `trace` and `to-name`.
    fn render(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

/// An instance of a host type.
#[derive(Clone)]
pub struct HostObject {
    ty: HostType,
    data: Arc<dyn HostData>,
}

impl HostObject {
    pub fn new(ty: HostType, data: impl HostData) -> Self {
        HostObject {
            ty,
            data: Arc::new(data),
        }
    }

    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    /// Borrow the payload as a concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.data.as_any().downcast_ref::<T>()
    }

    /// Identity comparison; host objects have reference semantics.
    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Display for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data.render())
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("ty", &self.ty)
            .field("data", &self.data)
            .finish()
    }
}

/// A host value as seen by the interpreter: a type handle or an object.
#[derive(Clone, Debug)]
pub enum HostHandle {
    Type(HostType),
    Object(HostObject),
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostHandle::Type(a), HostHandle::Type(b)) => a == b,
            (HostHandle::Object(a), HostHandle::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostHandle::Type(ty) => write!(f, "{ty}"),
            HostHandle::Object(object) => write!(f, "{object}"),
        }
    }
}
