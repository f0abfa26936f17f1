//! Lexer errors.
//!
//! Malformed input is never an error: unterminated strings run to end of
//! input and unmatched delimiters are left for the parser. Only pragma
//! directives can fail.

/// A lexer failure at a byte offset of the source being tokenized.
///
/// For errors raised inside a loaded file the offset is relative to that
/// file's text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (at byte {offset})")]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(offset: usize, kind: LexErrorKind) -> Self {
        LexError { offset, kind }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unknown pragma '{0}'")]
    UnknownPragma(String),
    #[error("pragma {pragma} is missing an argument")]
    MissingPragmaArgument { pragma: &'static str },
    #[error("namespace group of pragma reference is not closed")]
    UnclosedNamespaceGroup,
    #[error("load-file nesting exceeds {limit}")]
    LoadDepthExceeded { limit: usize },
    #[error("pragma {pragma} failed: {message}")]
    Pragma {
        pragma: &'static str,
        message: String,
    },
}
