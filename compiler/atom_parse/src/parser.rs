//! Recursive list builder.

use atom_ir::{Items, Value};
use atom_lexer::{DelimiterRole, Syntax, Token};
use atom_stack::ensure_sufficient_stack;
use tracing::debug;

/// Effective meaning of a delimiter at the point it is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Open,
    Close,
}

/// What ended a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Closed {
    Delimiter,
    EndOfInput,
}

pub struct Parser<'s> {
    tokens: std::vec::IntoIter<Token>,
    syntax: &'s Syntax,
    /// Toggle characters currently acting as closers.
    closing_toggles: Vec<char>,
}

impl<'s> Parser<'s> {
    pub fn new(tokens: Vec<Token>, syntax: &'s Syntax) -> Self {
        Parser {
            tokens: tokens.into_iter(),
            syntax,
            closing_toggles: Vec::new(),
        }
    }

    /// Parse the whole program.
    pub fn parse(mut self) -> Items {
        let (items, closed) = self.parse_list(0);
        if closed == Closed::Delimiter {
            let ignored = self.tokens.len();
            debug!(ignored, "stray closer at top level ends the program");
        }
        items
    }

    fn parse_list(&mut self, depth: usize) -> (Items, Closed) {
        ensure_sufficient_stack(|| {
            let mut values = Vec::new();
            while let Some(token) = self.tokens.next() {
                let c = match token {
                    Token::Value(value) => {
                        values.push(value);
                        continue;
                    }
                    Token::Splice(loaded) => {
                        values.extend(Parser::new(loaded, self.syntax).parse().to_vec());
                        continue;
                    }
                    Token::Delimiter(c) => c,
                };
                match self.step(c) {
                    Some(Step::Open) => {
                        let (nested, closed) = self.parse_list(depth + 1);
                        values.push(Value::List(nested));
                        if closed == Closed::EndOfInput {
                            break;
                        }
                    }
                    Some(Step::Close) => {
                        return (Items::from_vec(values), Closed::Delimiter);
                    }
                    // Delimiters of another syntax pass through as symbols.
                    None => values.push(Value::symbol(c.encode_utf8(&mut [0; 4]))),
                }
            }
            if depth > 0 {
                debug!(depth, "unclosed list at end of input");
            }
            (Items::from_vec(values), Closed::EndOfInput)
        })
    }

    /// Classify `c`, flipping a toggle for the rest of the parse.
    fn step(&mut self, c: char) -> Option<Step> {
        match self.syntax.role(c)? {
            DelimiterRole::Begin => Some(Step::Open),
            DelimiterRole::End => Some(Step::Close),
            DelimiterRole::Toggle => {
                if let Some(pos) = self.closing_toggles.iter().position(|&t| t == c) {
                    self.closing_toggles.swap_remove(pos);
                    Some(Step::Close)
                } else {
                    self.closing_toggles.push(c);
                    Some(Step::Open)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
