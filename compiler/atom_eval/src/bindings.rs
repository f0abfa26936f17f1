//! Scoped symbol tables.
//!
//! A stack of scopes searched innermost to outermost. The interpreter keeps
//! two: set-bindings for words (primitives, procedures, imported host
//! vocabulary) and put-bindings for call-local values. Put-scopes are entered
//! per procedure call, which gives procedures dynamic rather than lexical
//! scoping: a body sees whatever put-bindings are live when it runs.

use rustc_hash::FxHashMap;

use atom_ir::{Symbol, Value};

use crate::BindingError;

/// One activation's bindings.
pub type Scope = FxHashMap<Symbol, Value>;

/// Stack of scopes. Never empty.
#[derive(Clone, Debug)]
pub struct ScopedBindings {
    scopes: Vec<Scope>,
}

impl ScopedBindings {
    pub fn new() -> Self {
        ScopedBindings {
            scopes: vec![Scope::default()],
        }
    }

    /// Number of scopes, at least 1.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Leave the innermost scope.
    ///
    /// The outermost scope is never removed: leaving it is a bug in the
    /// caller, asserted in debug builds and ignored in release builds.
    #[inline]
    pub fn leave_scope(&mut self) {
        debug_assert!(
            self.scopes.len() > 1,
            "ScopedBindings::leave_scope() called on the outermost scope"
        );
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind in the innermost scope; the key must be new to that scope.
    pub fn add(&mut self, key: Symbol, value: Value) -> Result<(), BindingError> {
        let scope = self.innermost_mut();
        if scope.contains_key(&key) {
            return Err(BindingError::Duplicate(key));
        }
        scope.insert(key, value);
        Ok(())
    }

    /// Bind in the innermost scope, replacing a binding there and shadowing
    /// any outer one.
    pub fn set(&mut self, key: Symbol, value: Value) {
        self.innermost_mut().insert(key, value);
    }

    /// Innermost binding of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Scope at `index`, 0 being the outermost.
    pub fn scope(&self, index: usize) -> Option<&Scope> {
        self.scopes.get(index)
    }

    /// Drop every scope but the outermost and clear it.
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        self.innermost_mut().clear();
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

impl Default for ScopedBindings {
    fn default() -> Self {
        Self::new()
    }
}
