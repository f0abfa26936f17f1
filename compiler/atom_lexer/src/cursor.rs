//! Character cursor over source text.
//!
//! Positions are byte offsets into the source; all movement is by whole
//! `char`s so slices are always valid UTF-8.

use memchr::memchr;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor { source, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    pub(crate) fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Consume up to (not including) the next `"`, returning the consumed text.
    /// Runs to end of input when there is no closing quote.
    pub(crate) fn eat_until_quote(&mut self) -> &'a str {
        let rest = &self.source[self.pos..];
        let len = memchr(b'"', rest.as_bytes()).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }
}

#[cfg(test)]
mod tests;
