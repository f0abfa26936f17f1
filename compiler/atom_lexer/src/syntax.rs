//! Delimiter configuration.
//!
//! A [`Syntax`] lists which characters open a list, close a list, or toggle
//! between the two. The lexer emits every configured character as its own
//! token; the parser uses the same configuration to build structure.

/// How the parser treats a delimiter character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelimiterRole {
    Begin,
    End,
    /// Opens on its first occurrence, closes on its next, and so on.
    Toggle,
}

/// Active delimiter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Syntax {
    delimiters: Vec<(char, DelimiterRole)>,
}

impl Default for Syntax {
    /// `(` and `)` for lists, `|` as a toggle.
    fn default() -> Self {
        Syntax {
            delimiters: vec![
                ('(', DelimiterRole::Begin),
                (')', DelimiterRole::End),
                ('|', DelimiterRole::Toggle),
            ],
        }
    }
}

impl Syntax {
    /// Only `(` and `)`.
    pub fn parentheses() -> Self {
        Syntax {
            delimiters: vec![('(', DelimiterRole::Begin), (')', DelimiterRole::End)],
        }
    }

    /// Add `<` and `>` as a begin/end pair.
    #[must_use]
    pub fn with_angle_brackets(self) -> Self {
        self.with('<', DelimiterRole::Begin)
            .with('>', DelimiterRole::End)
    }

    /// Add `'` as a toggle.
    #[must_use]
    pub fn with_apostrophe(self) -> Self {
        self.with('\'', DelimiterRole::Toggle)
    }

    /// Add or reassign a delimiter. `"` and whitespace cannot be delimiters
    /// and are ignored.
    #[must_use]
    pub fn with(mut self, c: char, role: DelimiterRole) -> Self {
        if c == '"' || c.is_whitespace() {
            return self;
        }
        match self.delimiters.iter_mut().find(|(d, _)| *d == c) {
            Some(entry) => entry.1 = role,
            None => self.delimiters.push((c, role)),
        }
        self
    }

    pub fn role(&self, c: char) -> Option<DelimiterRole> {
        self.delimiters
            .iter()
            .find_map(|&(d, role)| (d == c).then_some(role))
    }

    #[inline]
    pub fn is_delimiter(&self, c: char) -> bool {
        self.role(c).is_some()
    }
}
