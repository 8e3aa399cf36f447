//! Compiler configuration.
//!
//! A [`Config`] is passed by value into every query. Nothing in the compiler
//! reads process-wide state, so two queries with different settings can be
//! built side by side on different threads.

/// How enum members are written into parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnumEncoding {
    /// The member name as text
    #[default]
    Name,
    /// The declared ordinal as an integer
    Integer,
}

/// Settings that alter generated SQL without changing the dialect.
///
/// ```
/// use ormlite_core::{Config, EnumEncoding};
///
/// let config = Config::new()
///     .strip_upper_in_like(true)
///     .enum_encoding(EnumEncoding::Integer);
/// assert!(config.strip_upper_in_like);
/// assert!(!config.include_table_prefixes);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Render `col LIKE pattern` instead of `UPPER(col) LIKE UPPER(pattern)`
    pub strip_upper_in_like: bool,
    /// Qualify every column with its table, even in single-table queries
    pub include_table_prefixes: bool,
    pub enum_encoding: EnumEncoding,
    /// Row count emitted when only an offset is set and the dialect needs both
    pub max_rows_without_limit: u64,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            strip_upper_in_like: false,
            include_table_prefixes: false,
            enum_encoding: EnumEncoding::Name,
            max_rows_without_limit: i32::MAX as u64,
        }
    }

    pub const fn strip_upper_in_like(mut self, value: bool) -> Self {
        self.strip_upper_in_like = value;
        self
    }

    pub const fn include_table_prefixes(mut self, value: bool) -> Self {
        self.include_table_prefixes = value;
        self
    }

    pub const fn enum_encoding(mut self, encoding: EnumEncoding) -> Self {
        self.enum_encoding = encoding;
        self
    }

    pub const fn max_rows_without_limit(mut self, rows: u64) -> Self {
        self.max_rows_without_limit = rows;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
