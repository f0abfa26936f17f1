//! Atom lexer.
//!
//! Turns source text into a [`Token`] sequence. Delimiters are not fixed:
//! the active [`Syntax`] decides which characters open, close or toggle a
//! list. Words are converted to integers, floats or symbols as they are
//! scanned, so the parser only has to build structure.
//!
//! The word `pragma` escapes into lexer directives (`load-file`, `reference`)
//! that are handed to a [`PragmaHandler`]. A loaded file comes back as one
//! [`Token::Splice`] group; the directive words themselves never reach the
//! token stream.

mod cursor;
mod lex_error;
mod lexer;
mod syntax;

pub use lex_error::{LexError, LexErrorKind};
pub use lexer::{tokenize, Lexer, NoPragmas, PragmaHandler, Token, DEFAULT_MAX_LOAD_DEPTH};
pub use syntax::{DelimiterRole, Syntax};
