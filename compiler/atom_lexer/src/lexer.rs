//! Tokenizer.
//!
//! Scans left to right: whitespace is skipped, `"` opens a string literal
//! that runs to the next `"` (or end of input), configured delimiters become
//! single-character tokens, and every other run of characters is a word.
//! Words convert to an integer, then a float, then a symbol.

use atom_ir::Value;
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::{DelimiterRole, LexError, LexErrorKind, Syntax};

/// Nesting limit for `pragma load-file`.
pub const DEFAULT_MAX_LOAD_DEPTH: usize = 32;

const PRAGMA: &str = "pragma";

/// A lexed token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A literal or word, already converted.
    Value(Value),
    /// A character from the active [`Syntax`].
    Delimiter(char),
    /// Tokens of a `load-file`d source. They are parsed on their own, with
    /// fresh delimiter state, and the resulting elements are spliced in place.
    Splice(Vec<Token>),
}

/// One raw token of a single source text, before pragmas are applied.
enum Lexeme {
    Value(Value),
    Delimiter(char),
}

impl From<Lexeme> for Token {
    fn from(lexeme: Lexeme) -> Self {
        match lexeme {
            Lexeme::Value(value) => Token::Value(value),
            Lexeme::Delimiter(c) => Token::Delimiter(c),
        }
    }
}

/// Receiver of pragma directives.
pub trait PragmaHandler {
    /// Source text for `pragma load-file <name>`.
    fn load_file(&mut self, name: &str) -> Result<String, String>;

    /// Import host vocabulary for `pragma reference <module> <namespaces>`.
    fn reference(&mut self, module: &str, namespaces: &[String]) -> Result<(), String>;
}

/// Rejects every pragma.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPragmas;

impl PragmaHandler for NoPragmas {
    fn load_file(&mut self, _name: &str) -> Result<String, String> {
        Err("pragmas are not available here".to_string())
    }

    fn reference(&mut self, _module: &str, _namespaces: &[String]) -> Result<(), String> {
        Err("pragmas are not available here".to_string())
    }
}

/// Tokenize `source` with default limits.
pub fn tokenize(
    source: &str,
    syntax: &Syntax,
    handler: &mut dyn PragmaHandler,
) -> Result<Vec<Token>, LexError> {
    Lexer::new(syntax).tokenize(source, handler)
}

/// Configured tokenizer.
pub struct Lexer<'s> {
    syntax: &'s Syntax,
    max_load_depth: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(syntax: &'s Syntax) -> Self {
        Lexer {
            syntax,
            max_load_depth: DEFAULT_MAX_LOAD_DEPTH,
        }
    }

    #[must_use]
    pub fn max_load_depth(mut self, depth: usize) -> Self {
        self.max_load_depth = depth;
        self
    }

    pub fn tokenize(
        &self,
        source: &str,
        handler: &mut dyn PragmaHandler,
    ) -> Result<Vec<Token>, LexError> {
        let mut out = Vec::new();
        self.tokenize_into(source, handler, 0, &mut out)?;
        Ok(out)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(len = source.len(), depth = depth))]
    fn tokenize_into(
        &self,
        source: &str,
        handler: &mut dyn PragmaHandler,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let mut scanner = Scanner::new(source, self.syntax);
        while let Some((offset, token)) = scanner.next_token() {
            if is_word(&token, PRAGMA) {
                self.pragma(&mut scanner, offset, handler, depth, out)?;
            } else {
                out.push(token.into());
            }
        }
        trace!(tokens = out.len(), "tokenized");
        Ok(())
    }

    fn pragma(
        &self,
        scanner: &mut Scanner<'_>,
        offset: usize,
        handler: &mut dyn PragmaHandler,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let missing = |pragma| LexError::new(offset, LexErrorKind::MissingPragmaArgument { pragma });
        let keyword = match scanner.next_token() {
            Some((_, Lexeme::Value(Value::Symbol(keyword)))) => keyword,
            Some((_, Lexeme::Value(other))) => {
                return Err(LexError::new(
                    offset,
                    LexErrorKind::UnknownPragma(other.to_string()),
                ))
            }
            Some((_, Lexeme::Delimiter(_))) | None => return Err(missing(PRAGMA)),
        };

        match keyword.as_str() {
            "load-file" => {
                let name = scanner.next_text().ok_or_else(|| missing("load-file"))?;
                if depth >= self.max_load_depth {
                    return Err(LexError::new(
                        offset,
                        LexErrorKind::LoadDepthExceeded {
                            limit: self.max_load_depth,
                        },
                    ));
                }
                debug!(file = %name, depth, "pragma load-file");
                let text = handler.load_file(&name).map_err(|message| {
                    LexError::new(
                        offset,
                        LexErrorKind::Pragma {
                            pragma: "load-file",
                            message,
                        },
                    )
                })?;
                let mut loaded = Vec::new();
                self.tokenize_into(&text, handler, depth + 1, &mut loaded)?;
                out.push(Token::Splice(loaded));
                Ok(())
            }
            "reference" => {
                let module = scanner.next_text().ok_or_else(|| missing("reference"))?;
                let namespaces = scanner
                    .namespaces()
                    .map_err(|kind| LexError::new(offset, kind))?;
                debug!(%module, ?namespaces, "pragma reference");
                handler.reference(&module, &namespaces).map_err(|message| {
                    LexError::new(
                        offset,
                        LexErrorKind::Pragma {
                            pragma: "reference",
                            message,
                        },
                    )
                })
            }
            other => Err(LexError::new(
                offset,
                LexErrorKind::UnknownPragma(other.to_string()),
            )),
        }
    }
}

fn is_word(lexeme: &Lexeme, word: &str) -> bool {
    matches!(lexeme, Lexeme::Value(Value::Symbol(symbol)) if symbol.as_str() == word)
}

/// Raw token producer over one source text.
struct Scanner<'a> {
    cursor: Cursor<'a>,
    syntax: &'a Syntax,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, syntax: &'a Syntax) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            syntax,
        }
    }

    /// Next token with its starting byte offset.
    fn next_token(&mut self) -> Option<(usize, Lexeme)> {
        self.cursor.eat_while(char::is_whitespace);
        let start = self.cursor.pos();
        let c = self.cursor.current()?;

        if c == '"' {
            self.cursor.advance();
            let text = self.cursor.eat_until_quote();
            // Unterminated literals end silently at end of input.
            self.cursor.advance();
            return Some((start, Lexeme::Value(Value::string(text))));
        }

        if self.syntax.is_delimiter(c) {
            self.cursor.advance();
            return Some((start, Lexeme::Delimiter(c)));
        }

        let syntax = self.syntax;
        self.cursor
            .eat_while(|c| !c.is_whitespace() && c != '"' && !syntax.is_delimiter(c));
        Some((start, Lexeme::Value(convert_word(self.cursor.slice_from(start)))))
    }

    /// Text of the next value token, for pragma arguments.
    fn next_text(&mut self) -> Option<String> {
        match self.next_token()? {
            (_, Lexeme::Value(value)) => Some(value.to_text()),
            (_, Lexeme::Delimiter(_)) => None,
        }
    }

    /// A single namespace, or a delimited group of them.
    fn namespaces(&mut self) -> Result<Vec<String>, LexErrorKind> {
        let missing = LexErrorKind::MissingPragmaArgument {
            pragma: "reference",
        };
        let opener = match self.next_token() {
            Some((_, Lexeme::Value(value))) => return Ok(vec![value.to_text()]),
            Some((_, Lexeme::Delimiter(c))) => c,
            None => return Err(missing),
        };
        let syntax = self.syntax;
        let closes = |c: char| match syntax.role(opener) {
            Some(DelimiterRole::Toggle) => c == opener,
            _ => syntax.role(c) == Some(DelimiterRole::End),
        };
        if syntax.role(opener) == Some(DelimiterRole::End) {
            return Err(missing);
        }

        let mut namespaces = Vec::new();
        loop {
            match self.next_token() {
                Some((_, Lexeme::Value(value))) => namespaces.push(value.to_text()),
                Some((_, Lexeme::Delimiter(c))) if closes(c) => return Ok(namespaces),
                Some((_, Lexeme::Delimiter(_))) => {}
                None => return Err(LexErrorKind::UnclosedNamespaceGroup),
            }
        }
    }
}

/// Integer, then float, then symbol.
///
/// Only text containing a digit is tried as a float, so words such as `inf`
/// and `NaN` stay symbols.
fn convert_word(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::Integer(n);
    }
    if text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(x) = text.parse::<f64>() {
            return Value::Float(x);
        }
    }
    Value::symbol(text)
}
