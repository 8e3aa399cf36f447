use std::borrow::Cow;
use std::fmt::Write;

use ormlite_types::{Dialect, Value};

use super::tokens::Token;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("table_name", "column_name")
/// - `Raw` - Unquoted raw SQL text (caller fragments, dialect operators)
/// - `Function` - Function name, rendered flush against its `(`
/// - `Param` - Parameter placeholder with its bound value
/// - `Number` - Unquoted integer literal (paging, substring offsets)
/// - `Fragment` - Caller-written SQL with its parameters, laid out verbatim
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Quoted identifier.
    /// Renders with the dialect's quote characters.
    Ident(Cow<'static, str>),

    /// Raw SQL text, copied as-is
    Raw(Cow<'static, str>),

    /// Function name such as `COUNT` or `UPPER`
    Function(Cow<'static, str>),

    /// Named parameter; the placeholder is chosen when the statement is built
    Param { name: String, value: Value },

    Number(i64),

    /// Caller text interleaved with parameters. No spacing is inserted
    /// inside; outside it spaces like raw text.
    Fragment(Vec<FragmentPart>),
}

/// One piece of a [`SQLChunk::Fragment`].
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentPart {
    Text(Cow<'static, str>),
    Param { name: String, value: Value },
}

impl SQLChunk {
    #[inline]
    pub const fn token(t: Token) -> Self {
        Self::Token(t)
    }

    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Ident(name.into())
    }

    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Raw(text.into())
    }

    /// Writes this chunk. Parameters are handled by the statement builder.
    pub(crate) fn write(&self, buf: &mut String, dialect: &Dialect) {
        match self {
            SQLChunk::Token(t) => buf.push_str(t.as_str()),
            SQLChunk::Ident(name) => dialect.write_ident(buf, name),
            SQLChunk::Raw(text) | SQLChunk::Function(text) => buf.push_str(text),
            SQLChunk::Param { name, .. } => {
                let _ = write!(buf, "{name}");
            }
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Fragment(parts) => {
                for part in parts {
                    match part {
                        FragmentPart::Text(text) => buf.push_str(text),
                        FragmentPart::Param { name, .. } => buf.push_str(name),
                    }
                }
            }
        }
    }

    /// Leading text of raw chunks, used for whitespace-aware spacing.
    pub(crate) fn leading_text(&self) -> Option<&str> {
        match self {
            SQLChunk::Raw(text) => Some(text),
            SQLChunk::Fragment(parts) => match parts.first() {
                Some(FragmentPart::Text(text)) => Some(text),
                _ => None,
            },
            _ => None,
        }
    }

    /// Trailing text of raw chunks, used for whitespace-aware spacing.
    pub(crate) fn trailing_text(&self) -> Option<&str> {
        match self {
            SQLChunk::Raw(text) => Some(text),
            SQLChunk::Fragment(parts) => match parts.last() {
                Some(FragmentPart::Text(text)) => Some(text),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this chunk reads as a word when deciding on spacing.
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !t.is_punctuation() && !t.is_operator(),
            SQLChunk::Ident(_)
            | SQLChunk::Raw(_)
            | SQLChunk::Function(_)
            | SQLChunk::Param { .. }
            | SQLChunk::Number(_)
            | SQLChunk::Fragment(_) => true,
        }
    }
}

impl From<Token> for SQLChunk {
    fn from(value: Token) -> Self {
        SQLChunk::Token(value)
    }
}
