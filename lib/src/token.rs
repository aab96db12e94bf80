use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// The fixed category taxonomy attached to every lexed span.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Text,
    Whitespace,
    Keyword,
    Number,
    Operator,
    Punctuation,
    Comment,
    String,
    StringEscape,
    StringChar,
    StringAffix,
    Name,
    Error,
}

impl TokenKind {
    pub const ALL: &'static [TokenKind] = &[
        TokenKind::Text,
        TokenKind::Whitespace,
        TokenKind::Keyword,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Punctuation,
        TokenKind::Comment,
        TokenKind::String,
        TokenKind::StringEscape,
        TokenKind::StringChar,
        TokenKind::StringAffix,
        TokenKind::Name,
        TokenKind::Error,
    ];

    /// The short CSS class used in highlighted markup. Empty for plain text.
    pub fn css_class(self) -> &'static str {
        match self {
            TokenKind::Text => "",
            TokenKind::Whitespace => "w",
            TokenKind::Keyword => "k",
            TokenKind::Number => "m",
            TokenKind::Operator => "o",
            TokenKind::Punctuation => "p",
            TokenKind::Comment => "c",
            TokenKind::String => "s",
            TokenKind::StringEscape => "se",
            TokenKind::StringChar => "sc",
            TokenKind::StringAffix => "sa",
            TokenKind::Name => "n",
            TokenKind::Error => "err",
        }
    }

    /// The dotted hierarchical name, e.g. `Literal.String.Escape`.
    pub fn dotted(self) -> &'static str {
        match self {
            TokenKind::Text => "Text",
            TokenKind::Whitespace => "Text.Whitespace",
            TokenKind::Keyword => "Keyword",
            TokenKind::Number => "Literal.Number",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuation => "Punctuation",
            TokenKind::Comment => "Comment",
            TokenKind::String => "Literal.String",
            TokenKind::StringEscape => "Literal.String.Escape",
            TokenKind::StringChar => "Literal.String.Char",
            TokenKind::StringAffix => "Literal.String.Affix",
            TokenKind::Name => "Name",
            TokenKind::Error => "Error",
        }
    }

    /// The kind whose style this kind inherits when a style leaves it unset.
    pub fn parent(self) -> Option<TokenKind> {
        match self {
            TokenKind::StringEscape
            | TokenKind::StringChar
            | TokenKind::StringAffix => Some(TokenKind::String),
            TokenKind::Whitespace => Some(TokenKind::Text),
            _ => None,
        }
    }

    #[inline]
    pub fn is_plain(self) -> bool {
        matches!(self, TokenKind::Text | TokenKind::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dotted().fmt(f)
    }
}

/// A categorized span of the lexed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'t> {
    pub kind: TokenKind,
    pub start: usize,
    pub text: &'t str,
}

impl<'t> Token<'t> {
    #[inline]
    pub fn new(kind: TokenKind, start: usize, text: &'t str) -> Self {
        Token { kind, start, text }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }
}
