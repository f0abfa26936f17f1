//! Ordered value lists, used both as parsed code and as runtime lists.
//!
//! `Items` is a shared handle: cloning it, binding it with `set` or recording
//! it in a call frame aliases the same list, and a mutation through any alias
//! is visible through all of them. Readers take a short lock and never hold
//! it across evaluation; [`Items::to_vec`] and [`Items::get`] hand out clones.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Value;

/// An ordered, mutable, insertion-order sequence of values.
#[derive(Clone, Default)]
pub struct Items(Arc<RwLock<Vec<Value>>>);

impl Items {
    /// Create an empty list.
    pub fn new() -> Self {
        Items::default()
    }

    /// Wrap an owned vector.
    pub fn from_vec(values: Vec<Value>) -> Self {
        Items(Arc::new(RwLock::new(values)))
    }

    /// A one-element list, used when a non-list value is evaluated.
    pub fn single(value: Value) -> Self {
        Items::from_vec(vec![value])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// The element at `index`, as it is right now.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Current elements, detached from later mutation.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Insert at `index`; `false` when `index` is past the end.
    pub fn insert(&self, index: usize, value: Value) -> bool {
        let mut values = self.0.write();
        if index > values.len() {
            return false;
        }
        values.insert(index, value);
        true
    }

    /// Replace the element at `index`, returning the old one.
    pub fn replace(&self, index: usize, value: Value) -> Option<Value> {
        let mut values = self.0.write();
        values
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut values = self.0.write();
        (index < values.len()).then(|| values.remove(index))
    }

    pub fn clear(&self) {
        self.0.write().clear();
    }

    /// Whether both handles alias the same list.
    pub fn ptr_eq(&self, other: &Items) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Aliases are equal; distinct lists compare element by element.
impl PartialEq for Items {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.to_vec() == other.to_vec()
    }
}

impl From<Vec<Value>> for Items {
    fn from(values: Vec<Value>) -> Self {
        Items::from_vec(values)
    }
}

impl FromIterator<Value> for Items {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Items::from_vec(iter.into_iter().collect())
    }
}

/// Parenthesized, space separated printed forms: `(1 two (3))`.
impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.to_vec().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec().iter()).finish()
    }
}
