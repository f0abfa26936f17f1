//! Atom IR - the value model shared by every stage of the Atom runtime.
//!
//! Atom programs are code-as-data: the parser produces [`Items`] whose
//! elements are ordinary [`Value`]s, and the evaluator walks those same lists.
//!
//! # Contents
//!
//! - [`Symbol`]: identifier compared and hashed by its text
//! - [`Items`]: shared, copy-on-write ordered list of values
//! - [`Value`]: the tagged union every primitive pops and pushes
//! - [`NativeAction`], [`Primitive`], [`OperatorKind`]: callable words
//! - [`HostType`], [`HostObject`], [`HostHandle`]: opaque host interop handles
//! - [`Callback`], [`CallbackPort`]: interpreted code handed to host code

mod action;
mod callback;
mod host;
mod items;
mod symbol;
mod value;

pub use action::{NativeAction, OperatorKind, Primitive};
pub use callback::{Callback, CallbackError, CallbackPort, Signature};
pub use host::{HostData, HostHandle, HostObject, HostType};
pub use items::Items;
pub use symbol::Symbol;
pub use value::Value;
