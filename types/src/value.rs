//! Bindable values
//!
//! [`Value`] is the single owned representation of every literal that leaves
//! an expression as a parameter.

use std::fmt::Write;

use crate::Dialect;

/// Database-level type of a value or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DbType {
    #[default]
    Null,
    Boolean,
    Integer,
    Real,
    Text,
    Blob,
}

/// An owned SQL value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    /// An enum member. How it reaches the database (by name or by ordinal)
    /// is decided when the value is bound.
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    Enum { name: &'static str, ordinal: i64 },
}

impl Value {
    /// Inferred database type.
    ///
    /// ```
    /// use ormlite_types::{DbType, Value};
    ///
    /// assert_eq!(Value::from(3).db_type(), DbType::Integer);
    /// assert_eq!(Value::from("x").db_type(), DbType::Text);
    /// assert_eq!(Value::from(None::<i32>).db_type(), DbType::Null);
    /// ```
    pub const fn db_type(&self) -> DbType {
        match self {
            Value::Null => DbType::Null,
            Value::Bool(_) => DbType::Boolean,
            Value::Integer(_) => DbType::Integer,
            Value::Real(_) => DbType::Real,
            Value::Text(_) => DbType::Text,
            Value::Blob(_) => DbType::Blob,
            Value::Enum { .. } => DbType::Null,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Enum { ordinal, .. } => Some(*ordinal),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Renders this value as an inline SQL literal.
    ///
    /// Only meant for debug output; statements sent to a database bind values
    /// as parameters instead.
    ///
    /// ```
    /// use ormlite_types::{Dialect, Value};
    ///
    /// let d = Dialect::sqlite();
    /// assert_eq!(Value::from("it's").to_sql_literal(&d), "'it''s'");
    /// assert_eq!(Value::from(true).to_sql_literal(&d), "1");
    /// assert_eq!(Value::Blob(vec![0xab, 1]).to_sql_literal(&d), "X'AB01'");
    /// ```
    pub fn to_sql_literal(&self, dialect: &Dialect) -> String {
        let mut out = String::new();
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Bool(b) => out.push_str(dialect.bool_literal(*b)),
            Value::Integer(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Real(f) => {
                let _ = write!(out, "{f:?}");
            }
            Value::Text(s) => write_quoted(&mut out, s),
            Value::Enum { name, .. } => write_quoted(&mut out, name),
            Value::Blob(bytes) => {
                out.push_str("X'");
                for b in bytes {
                    let _ = write!(out, "{b:02X}");
                }
                out.push('\'');
            }
        }
        out
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::Enum { name, .. } => f.write_str(name),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<char> for Value {
    #[inline]
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Value::Text(v.format("%Y-%m-%d").to_string())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDateTime> for Value {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Value::Text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for Value
where
    Tz::Offset: core::fmt::Display,
{
    fn from(v: chrono::DateTime<Tz>) -> Self {
        Value::Text(v.to_rfc3339())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

// =============================================================================
// rusqlite binding
// =============================================================================

#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, ValueRef};

        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b))),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Enum { name, .. } => ToSqlOutput::Borrowed(ValueRef::Text(name.as_bytes())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(5u8)), Value::Integer(5));
        assert_eq!(Value::from(None::<String>), Value::Null);
    }

    #[test]
    fn test_literals() {
        let pg = Dialect::postgres();
        assert_eq!(Value::Bool(false).to_sql_literal(&pg), "false");
        assert_eq!(Value::Real(1.5).to_sql_literal(&pg), "1.5");
        assert_eq!(Value::Null.to_sql_literal(&pg), "NULL");
        assert_eq!(
            Value::Enum { name: "Active", ordinal: 1 }.to_sql_literal(&pg),
            "'Active'"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Value::Integer(7)).unwrap();
        assert_eq!(json, r#"{"Integer":7}"#);
        let back: Value = serde_json::from_str(r#"{"Text":"x"}"#).unwrap();
        assert_eq!(back, Value::Text("x".into()));
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Integer(4).as_f64(), Some(4.0));
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::Text("a".into()).as_i64(), None);
    }
}
