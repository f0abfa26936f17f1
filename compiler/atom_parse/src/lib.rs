//! Atom parser.
//!
//! Programs are lists. The parser only groups tokens: a begin delimiter opens
//! a nested [`Items`], an end delimiter closes it, and a toggle delimiter
//! alternates between the two. Every other token is already a [`Value`].
//!
//! Parsing never fails. A missing closer returns the partial list, and a
//! stray closer at top level ends the program. A [`Token::Splice`] group is
//! parsed the same way on its own, so its stray or missing closers stay
//! inside it, and its elements join the enclosing list.
//!
//! [`Value`]: atom_ir::Value

mod parser;

use atom_ir::Items;
use atom_lexer::{Syntax, Token};

pub use parser::Parser;

/// Parse a token sequence into a list.
pub fn parse_items(tokens: Vec<Token>, syntax: &Syntax) -> Items {
    Parser::new(tokens, syntax).parse()
}
