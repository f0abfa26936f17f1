//! RAII put-scope.
//!
//! Running a set-binding list opens a fresh put-scope for its locals. The
//! guard leaves that scope when dropped, so an error propagating out of the
//! body still restores the caller's bindings.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Interpreter access inside a put-scope; the scope is left on drop.
pub struct PutScope<'guard> {
    interpreter: &'guard mut Interpreter,
}

impl Drop for PutScope<'_> {
    fn drop(&mut self) {
        self.interpreter.put_bindings.leave_scope();
    }
}

impl Deref for PutScope<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for PutScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Enter a put-scope that is left when the guard drops.
    pub fn put_scope(&mut self) -> PutScope<'_> {
        self.put_bindings.enter_scope();
        PutScope { interpreter: self }
    }
}

#[cfg(test)]
mod tests;
