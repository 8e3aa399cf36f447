mod chunk;
mod tokens;

use std::borrow::Cow;

pub use chunk::*;
use ormlite_types::{Dialect, PlaceholderStyle, Value};
use smallvec::SmallVec;
pub use tokens::*;

use crate::param::Param;

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation. Spacing is not stored; it is derived from chunk
/// adjacency when the fragment is built into text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a single quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates SQL with raw text
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    #[inline]
    pub fn number(value: i64) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Number(value)],
        }
    }

    /// Creates SQL referencing one named parameter
    #[inline]
    pub fn param(name: impl Into<String>, value: Value) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Param {
                name: name.into(),
                value,
            }],
        }
    }

    /// `name(args)`. Subqueries are wrapped in their own parentheses.
    pub fn func(name: impl Into<Cow<'static, str>>, args: SQL) -> Self {
        let args = if args.is_subquery() {
            args.parens()
        } else {
            args
        };
        SQL::empty()
            .push(SQLChunk::Function(name.into()))
            .push(Token::LPAREN)
            .append(args)
            .push(Token::RPAREN)
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL>) -> Self {
        self.append_mut(other);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<SQL>) {
        let other = other.into();
        if self.chunks.is_empty() {
            self.chunks = other.chunks;
            return;
        }
        self.chunks.extend(other.chunks);
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SQLChunk>) {
        self.chunks.push(chunk.into());
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== combinators ====================

    /// Joins multiple SQL fragments with a separator
    pub fn join<I>(sqls: I, separator: Token) -> SQL
    where
        I: IntoIterator<Item = SQL>,
    {
        let mut iter = sqls.into_iter();
        let Some(mut result) = iter.next() else {
            return SQL::empty();
        };
        for item in iter {
            result.chunks.push(SQLChunk::Token(separator));
            result.chunks.extend(item.chunks);
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Check if this SQL fragment is a subquery (starts with SELECT)
    #[inline]
    pub fn is_subquery(&self) -> bool {
        matches!(self.chunks.first(), Some(SQLChunk::Token(Token::SELECT)))
    }

    /// Creates an aliased version: self AS "name"
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> SQL {
        self.push(Token::AS).push(SQLChunk::Ident(name.into()))
    }

    // ==================== output ====================

    /// Renders the text with dialect placeholders and collects parameters in
    /// order of first appearance.
    ///
    /// Named and numbered placeholders are deduplicated by name, so a
    /// parameter referenced twice is bound once. Positional `?` placeholders
    /// are bound once per occurrence.
    pub fn build(&self, dialect: &Dialect) -> (String, Vec<Param>) {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(128));
        let mut params: Vec<Param> = Vec::new();

        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                SQLChunk::Param { name, value } => {
                    placeholder(&mut buf, &mut params, dialect, name, value);
                }
                SQLChunk::Fragment(parts) => {
                    for part in parts {
                        match part {
                            FragmentPart::Text(text) => buf.push_str(text),
                            FragmentPart::Param { name, value } => {
                                placeholder(&mut buf, &mut params, dialect, name, value);
                            }
                        }
                    }
                }
                _ => chunk.write(&mut buf, dialect),
            }

            if self.needs_space(i) {
                buf.push(' ');
            }
        }

        (buf, params)
    }

    /// Renders the text with every parameter inlined as a literal.
    ///
    /// Meant for logs and debugging; the output is not safe to execute with
    /// untrusted values.
    pub fn inline(&self, dialect: &Dialect) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(128));
        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                SQLChunk::Param { value, .. } => buf.push_str(&value.to_sql_literal(dialect)),
                SQLChunk::Fragment(parts) => {
                    for part in parts {
                        match part {
                            FragmentPart::Text(text) => buf.push_str(text),
                            FragmentPart::Param { value, .. } => {
                                buf.push_str(&value.to_sql_literal(dialect));
                            }
                        }
                    }
                }
                _ => chunk.write(&mut buf, dialect),
            }
            if self.needs_space(i) {
                buf.push(' ');
            }
        }
        buf
    }

    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };
        chunk_needs_space(&self.chunks[index], next)
    }
}

/// Writes one placeholder and records its parameter.
///
/// Named and numbered styles reuse the position of an earlier parameter
/// with the same name; positional `?` binds every occurrence.
fn placeholder(
    buf: &mut String,
    params: &mut Vec<Param>,
    dialect: &Dialect,
    name: &str,
    value: &Value,
) {
    let existing = match dialect.placeholders {
        PlaceholderStyle::Positional => None,
        _ => params.iter().position(|p| p.name == name),
    };
    let position = match existing {
        Some(found) => found + 1,
        None => {
            params.push(Param {
                name: name.to_owned(),
                value: value.clone(),
            });
            params.len()
        }
    };
    dialect.write_placeholder(buf, name, position);
}

pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    // No space if current raw text ends with whitespace
    if current
        .trailing_text()
        .is_some_and(|text| text.ends_with(char::is_whitespace))
    {
        return false;
    }

    // No space if next raw text starts with whitespace
    if next
        .leading_text()
        .is_some_and(|text| text.starts_with(char::is_whitespace))
    {
        return false;
    }

    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA | Token::SEMI | Token::DOT)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // Function names sit flush against their argument list
        (SQLChunk::Function(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Space around comparison/arithmetic operators, including ") ="
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space after closing paren if next is word-like (e.g., ") FROM")
        (SQLChunk::Token(Token::RPAREN), next) => next.is_word_like(),
        // Space before opening paren if preceded by word-like (e.g., "IN (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

// ==================== trait implementations ====================

impl From<Token> for SQL {
    fn from(value: Token) -> Self {
        SQL::token(value)
    }
}

impl From<SQLChunk> for SQL {
    fn from(value: SQLChunk) -> Self {
        Self {
            chunks: smallvec::smallvec![value],
        }
    }
}

impl<T: Into<SQLChunk>> FromIterator<T> for SQL {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(sql: &SQL) -> String {
        sql.build(&Dialect::sqlite()).0
    }

    #[test]
    fn spacing_follows_chunk_adjacency() {
        let sql = SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::FROM)
            .push(SQLChunk::ident("Person"))
            .push(Token::WHERE)
            .push(SQLChunk::ident("Age"))
            .push(Token::IN)
            .append(SQL::join([SQL::number(1), SQL::number(2)], Token::COMMA).parens());
        assert_eq!(
            text(&sql),
            r#"SELECT COUNT(*) FROM "Person" WHERE "Age" IN (1, 2)"#
        );
    }

    #[test]
    fn qualified_identifiers_have_no_spaces() {
        let sql = SQL::ident("Person")
            .push(Token::DOT)
            .push(SQLChunk::ident("Name"))
            .push(Token::EQ)
            .append(SQL::param("0", Value::Text("Ann".into())));
        assert_eq!(text(&sql), r#""Person"."Name" = @0"#);
    }

    #[test]
    fn operators_after_closing_paren_are_spaced() {
        let sql = SQL::ident("id")
            .push(SQLChunk::raw("&"))
            .append(SQL::param("0", Value::Integer(3)))
            .parens()
            .push(Token::EQ)
            .append(SQL::param("1", Value::Integer(1)));
        assert_eq!(text(&sql), r#"("id" & @0) = @1"#);

        let sql = SQL::token(Token::HAVING)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::GT)
            .append(SQL::number(3));
        assert_eq!(text(&sql), "HAVING COUNT(*) > 3");
    }

    #[test]
    fn repeated_params_bind_once_unless_positional() {
        let sql = SQL::param("0", Value::Integer(1))
            .push(Token::EQ)
            .append(SQL::param("0", Value::Integer(1)));

        let (named, params) = sql.build(&Dialect::sqlite());
        assert_eq!(named, "@0 = @0");
        assert_eq!(params.len(), 1);

        let (numbered, params) = sql.build(&Dialect::postgres());
        assert_eq!(numbered, "$1 = $1");
        assert_eq!(params.len(), 1);

        let (positional, params) = sql.build(&Dialect::mysql());
        assert_eq!(positional, "? = ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn fragments_keep_their_own_layout() {
        let fragment = SQLChunk::Fragment(vec![
            FragmentPart::Text("\"Age\" IN (".into()),
            FragmentPart::Param {
                name: "0".into(),
                value: Value::Integer(1),
            },
            FragmentPart::Text(")".into()),
        ]);
        let sql = SQL::token(Token::WHERE).push(fragment).push(Token::AND);
        let (text, params) = sql.build(&Dialect::sqlite());
        assert_eq!(text, r#"WHERE "Age" IN (@0) AND"#);
        assert_eq!(params.len(), 1);
        assert_eq!(sql.inline(&Dialect::sqlite()), r#"WHERE "Age" IN (1) AND"#);
    }

    #[test]
    fn inline_renders_literals() {
        let sql = SQL::ident("Name")
            .push(Token::EQ)
            .append(SQL::param("0", Value::Text("O'Brien".into())));
        assert_eq!(sql.inline(&Dialect::sqlite()), r#""Name" = 'O''Brien'"#);
    }
}
