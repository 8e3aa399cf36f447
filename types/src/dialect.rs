//! Dialect capability descriptors
//!
//! A [`Dialect`] is a plain value describing everything the renderer needs to
//! know about one RDBMS: identifier quoting, placeholder syntax, boolean
//! literals, LIKE escaping, paging and operator support. The compiler core
//! never matches on a database name to pick a token; it asks the descriptor.
//!
//! # Examples
//!
//! ```
//! use ormlite_types::{BitOp, Dialect, DialectKind, Paging};
//!
//! let pg = Dialect::postgres();
//! assert_eq!(pg.kind, DialectKind::PostgreSQL);
//! assert_eq!(pg.quote_ident("Person"), "\"Person\"");
//! assert!(pg.supports(BitOp::Xor));
//!
//! let mssql = Dialect::sql_server();
//! assert_eq!(mssql.paging, Paging::OffsetFetch);
//! assert!(!mssql.supports(BitOp::Shl));
//! ```

use std::borrow::Cow;
use std::fmt::Write;

use crate::DbType;

// =============================================================================
// Dialect kind
// =============================================================================

/// Identifies the RDBMS family a [`Dialect`] was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DialectKind {
    #[default]
    SQLite,
    PostgreSQL,
    MySQL,
    SqlServer,
    Oracle,
}

impl DialectKind {
    /// Parse a dialect kind from a string (case-insensitive)
    ///
    /// ```
    /// use ormlite_types::DialectKind;
    ///
    /// assert_eq!(DialectKind::parse("pg"), Some(DialectKind::PostgreSQL));
    /// assert_eq!(DialectKind::parse("mssql"), Some(DialectKind::SqlServer));
    /// assert_eq!(DialectKind::parse("db2"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        const NAMES: &[(&str, DialectKind)] = &[
            ("sqlite", DialectKind::SQLite),
            ("postgresql", DialectKind::PostgreSQL),
            ("postgres", DialectKind::PostgreSQL),
            ("pg", DialectKind::PostgreSQL),
            ("mysql", DialectKind::MySQL),
            ("mariadb", DialectKind::MySQL),
            ("sqlserver", DialectKind::SqlServer),
            ("mssql", DialectKind::SqlServer),
            ("oracle", DialectKind::Oracle),
        ];
        NAMES
            .iter()
            .find(|(name, _)| s.eq_ignore_ascii_case(name))
            .map(|(_, kind)| *kind)
    }

    /// Lowercase name of the dialect
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DialectKind::SQLite => "sqlite",
            DialectKind::PostgreSQL => "postgresql",
            DialectKind::MySQL => "mysql",
            DialectKind::SqlServer => "sqlserver",
            DialectKind::Oracle => "oracle",
        }
    }
}

impl core::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for DialectKind {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialectKind::parse(s).ok_or(DialectParseError)
    }
}

/// Error returned when parsing an unknown dialect string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectParseError;

impl core::fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown dialect")
    }
}

impl std::error::Error for DialectParseError {}

// =============================================================================
// Capability enums
// =============================================================================

/// How bound parameters appear in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `@name` / `:name`, each name rendered verbatim after the prefix
    Named(char),
    /// `$1, $2, ...` numbered by first appearance
    Numbered,
    /// `?`, values bound strictly in textual order
    Positional,
}

/// Row-window syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paging {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, needs an ORDER BY
    OffsetFetch,
    /// Nested `ROWNUM` filtering
    RowNum,
}

/// Substring function shape. Start positions are 1-based in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubstringStyle {
    /// `substring(x from s for n)`
    FromFor,
    /// `substr(x, s, n)`
    Substr,
    /// `substring(x, s, n)`, length required
    Substring,
}

/// Identifier naming applied to tables and columns without an explicit name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Naming {
    #[default]
    AsIs,
    LowerSnake,
}

impl Naming {
    /// Applies this strategy to a declared name.
    ///
    /// ```
    /// use ormlite_types::Naming;
    ///
    /// assert_eq!(Naming::LowerSnake.apply("FirstName"), "first_name");
    /// assert_eq!(Naming::LowerSnake.apply("first_name"), "first_name");
    /// assert_eq!(Naming::AsIs.apply("FirstName"), "FirstName");
    /// ```
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Naming::AsIs => Cow::Borrowed(name),
            Naming::LowerSnake => {
                if !name.chars().any(|c| c.is_ascii_uppercase()) {
                    return Cow::Borrowed(name);
                }
                let mut out = String::with_capacity(name.len() + 4);
                let mut prev_lower = false;
                for c in name.chars() {
                    if c.is_ascii_uppercase() {
                        if prev_lower {
                            out.push('_');
                        }
                        out.push(c.to_ascii_lowercase());
                        prev_lower = false;
                    } else {
                        prev_lower = c.is_ascii_alphanumeric();
                        out.push(c);
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

/// Bitwise operators a dialect may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Shl,
    Shr,
}

impl BitOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BitOp::And => "&",
            BitOp::Or => "|",
            BitOp::Xor => "^",
            BitOp::Shl => "<<",
            BitOp::Shr => ">>",
        }
    }
}

/// How one bitwise operator is spelled, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitSyntax {
    /// `a <op> b`
    Infix(&'static str),
    /// `FUNC(a, b)`
    Function(&'static str),
}

/// Per-operator bitwise support table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitwiseSupport {
    pub and: Option<BitSyntax>,
    pub or: Option<BitSyntax>,
    pub xor: Option<BitSyntax>,
    pub shl: Option<BitSyntax>,
    pub shr: Option<BitSyntax>,
}

impl BitwiseSupport {
    /// `& | ^ << >>` all infix
    pub const ALL_INFIX: Self = Self {
        and: Some(BitSyntax::Infix("&")),
        or: Some(BitSyntax::Infix("|")),
        xor: Some(BitSyntax::Infix("^")),
        shl: Some(BitSyntax::Infix("<<")),
        shr: Some(BitSyntax::Infix(">>")),
    };

    pub const fn get(&self, op: BitOp) -> Option<BitSyntax> {
        match op {
            BitOp::And => self.and,
            BitOp::Or => self.or,
            BitOp::Xor => self.xor,
            BitOp::Shl => self.shl,
            BitOp::Shr => self.shr,
        }
    }
}

// =============================================================================
// Dialect
// =============================================================================

/// Capability descriptor for one RDBMS.
///
/// Fields are public so a caller can derive a variant from a preset:
///
/// ```
/// use ormlite_types::{Dialect, Naming};
///
/// let pg = Dialect::postgres().with_naming(Naming::LowerSnake);
/// assert_eq!(pg.table_name("OrderLine", None), "order_line");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    pub kind: DialectKind,
    /// Opening and closing identifier quote
    pub quote: (char, char),
    pub placeholders: PlaceholderStyle,
    /// Rendered forms of `true` and `false`
    pub bool_literals: (&'static str, &'static str),
    /// Escape character for LIKE patterns
    pub like_escape: char,
    /// Whether a backslash inside a LIKE pattern must be escaped
    pub escape_backslash: bool,
    pub paging: Paging,
    pub bitwise: BitwiseSupport,
    pub random_function: &'static str,
    /// Character-count function
    pub length_function: &'static str,
    pub substring: SubstringStyle,
    /// Whether `AS` may precede a table or subquery alias
    pub table_alias_keyword: bool,
    pub naming: Naming,
}

impl Dialect {
    pub const fn sqlite() -> Self {
        Self {
            kind: DialectKind::SQLite,
            quote: ('"', '"'),
            placeholders: PlaceholderStyle::Named('@'),
            bool_literals: ("1", "0"),
            like_escape: '^',
            escape_backslash: true,
            paging: Paging::LimitOffset,
            bitwise: BitwiseSupport {
                xor: None,
                ..BitwiseSupport::ALL_INFIX
            },
            random_function: "RANDOM()",
            length_function: "LENGTH",
            substring: SubstringStyle::Substr,
            table_alias_keyword: true,
            naming: Naming::AsIs,
        }
    }

    pub const fn postgres() -> Self {
        Self {
            kind: DialectKind::PostgreSQL,
            quote: ('"', '"'),
            placeholders: PlaceholderStyle::Numbered,
            bool_literals: ("true", "false"),
            like_escape: '^',
            escape_backslash: true,
            paging: Paging::LimitOffset,
            bitwise: BitwiseSupport {
                xor: Some(BitSyntax::Infix("#")),
                ..BitwiseSupport::ALL_INFIX
            },
            random_function: "RANDOM()",
            length_function: "LENGTH",
            substring: SubstringStyle::FromFor,
            table_alias_keyword: true,
            naming: Naming::AsIs,
        }
    }

    pub const fn mysql() -> Self {
        Self {
            kind: DialectKind::MySQL,
            quote: ('`', '`'),
            placeholders: PlaceholderStyle::Positional,
            bool_literals: ("1", "0"),
            like_escape: '^',
            escape_backslash: true,
            paging: Paging::LimitOffset,
            bitwise: BitwiseSupport::ALL_INFIX,
            random_function: "RAND()",
            length_function: "CHAR_LENGTH",
            substring: SubstringStyle::Substring,
            table_alias_keyword: true,
            naming: Naming::AsIs,
        }
    }

    pub const fn sql_server() -> Self {
        Self {
            kind: DialectKind::SqlServer,
            quote: ('[', ']'),
            placeholders: PlaceholderStyle::Named('@'),
            bool_literals: ("1", "0"),
            like_escape: '^',
            escape_backslash: true,
            paging: Paging::OffsetFetch,
            bitwise: BitwiseSupport {
                shl: None,
                shr: None,
                ..BitwiseSupport::ALL_INFIX
            },
            random_function: "NEWID()",
            length_function: "LEN",
            substring: SubstringStyle::Substring,
            table_alias_keyword: true,
            naming: Naming::AsIs,
        }
    }

    pub const fn oracle() -> Self {
        Self {
            kind: DialectKind::Oracle,
            quote: ('"', '"'),
            placeholders: PlaceholderStyle::Named(':'),
            bool_literals: ("1", "0"),
            like_escape: '^',
            escape_backslash: false,
            paging: Paging::RowNum,
            bitwise: BitwiseSupport {
                and: Some(BitSyntax::Function("BITAND")),
                or: None,
                xor: None,
                shl: None,
                shr: None,
            },
            random_function: "dbms_random.value",
            length_function: "LENGTH",
            substring: SubstringStyle::Substr,
            table_alias_keyword: false,
            naming: Naming::AsIs,
        }
    }

    /// Preset for a dialect kind
    pub const fn for_kind(kind: DialectKind) -> Self {
        match kind {
            DialectKind::SQLite => Self::sqlite(),
            DialectKind::PostgreSQL => Self::postgres(),
            DialectKind::MySQL => Self::mysql(),
            DialectKind::SqlServer => Self::sql_server(),
            DialectKind::Oracle => Self::oracle(),
        }
    }

    pub const fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub const fn with_placeholders(mut self, style: PlaceholderStyle) -> Self {
        self.placeholders = style;
        self
    }

    /// Whether `op` can be rendered at all
    #[inline]
    pub const fn supports(&self, op: BitOp) -> bool {
        self.bitwise.get(op).is_some()
    }

    #[inline]
    pub const fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            self.bool_literals.0
        } else {
            self.bool_literals.1
        }
    }

    /// Quotes an identifier, doubling any embedded closing quote.
    pub fn quote_ident(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_ident(&mut out, name);
        out
    }

    pub fn write_ident(&self, buf: &mut impl Write, name: &str) {
        let (open, close) = self.quote;
        let _ = buf.write_char(open);
        for c in name.chars() {
            if c == close {
                let _ = buf.write_char(close);
            }
            let _ = buf.write_char(c);
        }
        let _ = buf.write_char(close);
    }

    /// Resolved (unquoted) table name: the explicit name wins over naming.
    pub fn table_name<'a>(&self, declared: &'a str, explicit: Option<&'a str>) -> Cow<'a, str> {
        match explicit {
            Some(name) => Cow::Borrowed(name),
            None => self.naming.apply(declared),
        }
    }

    /// Writes the placeholder for one parameter.
    ///
    /// `position` is the 1-based index among distinct parameters and is only
    /// used by [`PlaceholderStyle::Numbered`].
    pub fn write_placeholder(&self, buf: &mut impl Write, name: &str, position: usize) {
        match self.placeholders {
            PlaceholderStyle::Named(prefix) => {
                let _ = buf.write_char(prefix);
                let _ = buf.write_str(name);
            }
            PlaceholderStyle::Numbered => {
                let _ = write!(buf, "${position}");
            }
            PlaceholderStyle::Positional => {
                let _ = buf.write_char('?');
            }
        }
    }

    /// Type-to-SQL mapping used by `CAST(.. AS <type>)`.
    pub const fn cast_type(&self, ty: DbType) -> &'static str {
        match (self.kind, ty) {
            (DialectKind::SQLite, DbType::Boolean | DbType::Integer) => "INTEGER",
            (DialectKind::SQLite, DbType::Real) => "REAL",
            (DialectKind::SQLite, DbType::Blob) => "BLOB",
            (DialectKind::SQLite, _) => "TEXT",

            (DialectKind::PostgreSQL, DbType::Boolean) => "BOOLEAN",
            (DialectKind::PostgreSQL, DbType::Integer) => "BIGINT",
            (DialectKind::PostgreSQL, DbType::Real) => "DOUBLE PRECISION",
            (DialectKind::PostgreSQL, DbType::Blob) => "BYTEA",
            (DialectKind::PostgreSQL, _) => "TEXT",

            (DialectKind::MySQL, DbType::Boolean | DbType::Integer) => "SIGNED",
            (DialectKind::MySQL, DbType::Real) => "DOUBLE",
            (DialectKind::MySQL, DbType::Blob) => "BINARY",
            (DialectKind::MySQL, _) => "CHAR",

            (DialectKind::SqlServer, DbType::Boolean) => "BIT",
            (DialectKind::SqlServer, DbType::Integer) => "BIGINT",
            (DialectKind::SqlServer, DbType::Real) => "FLOAT",
            (DialectKind::SqlServer, DbType::Blob) => "VARBINARY(MAX)",
            (DialectKind::SqlServer, _) => "NVARCHAR(MAX)",

            (DialectKind::Oracle, DbType::Boolean) => "NUMBER(1)",
            (DialectKind::Oracle, DbType::Integer) => "NUMBER(19)",
            (DialectKind::Oracle, DbType::Real) => "BINARY_DOUBLE",
            (DialectKind::Oracle, DbType::Blob) => "BLOB",
            (DialectKind::Oracle, _) => "VARCHAR2(4000)",
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::sqlite()
    }
}

impl From<DialectKind> for Dialect {
    fn from(kind: DialectKind) -> Self {
        Self::for_kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(DialectKind::parse("SQLite"), Some(DialectKind::SQLite));
        assert_eq!(DialectKind::parse("postgres"), Some(DialectKind::PostgreSQL));
        assert_eq!(DialectKind::parse("MariaDB"), Some(DialectKind::MySQL));
        assert_eq!(DialectKind::parse("oracle"), Some(DialectKind::Oracle));
        assert_eq!(DialectKind::parse(""), None);
        assert!("nope".parse::<DialectKind>().is_err());
    }

    #[test]
    fn test_quote_ident_doubles_closing_quote() {
        assert_eq!(Dialect::sqlite().quote_ident(r#"a"b"#), r#""a""b""#);
        assert_eq!(Dialect::sql_server().quote_ident("x]y"), "[x]]y]");
        assert_eq!(Dialect::mysql().quote_ident("Id"), "`Id`");
    }

    #[test]
    fn test_placeholders() {
        let mut buf = String::new();
        Dialect::sqlite().write_placeholder(&mut buf, "0", 1);
        Dialect::oracle().write_placeholder(&mut buf, "1", 2);
        Dialect::postgres().write_placeholder(&mut buf, "2", 3);
        Dialect::mysql().write_placeholder(&mut buf, "3", 4);
        assert_eq!(buf, "@0:1$3?");
    }

    #[test]
    fn test_bitwise_capabilities() {
        assert!(!Dialect::sqlite().supports(BitOp::Xor));
        assert!(Dialect::sqlite().supports(BitOp::Shl));
        assert_eq!(
            Dialect::postgres().bitwise.get(BitOp::Xor),
            Some(BitSyntax::Infix("#"))
        );
        assert_eq!(
            Dialect::oracle().bitwise.get(BitOp::And),
            Some(BitSyntax::Function("BITAND"))
        );
        assert!(!Dialect::oracle().supports(BitOp::Or));
    }

    #[test]
    fn test_naming() {
        assert_eq!(Naming::LowerSnake.apply("OrderID"), "order_id");
        assert_eq!(Naming::LowerSnake.apply("Person"), "person");
        let d = Dialect::sqlite();
        assert_eq!(d.table_name("Person", Some("people")), "people");
    }
}
