//! Symbols: identifiers compared by text.
//!
//! Two independently constructed symbols with the same text are equal and
//! collide as map keys. The text is reference counted so cloning a symbol
//! (which happens on every lookup) never copies the string.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An immutable identifier used both as code and as a binding key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a symbol from its text.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Symbol(text.into())
    }

    /// The symbol's text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::new(text)
    }
}

impl From<String> for Symbol {
    fn from(text: String) -> Self {
        Symbol::new(text)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

#[cfg(test)]
mod tests;
