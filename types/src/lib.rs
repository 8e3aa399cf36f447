//! Shared type definitions for ormlite
//!
//! This crate provides the definitions shared by the query compiler and
//! anything that executes its output:
//!
//! - [`Dialect`] - Capability descriptor for one RDBMS, with presets
//! - [`Value`] - Owned bindable value
//! - [`DbType`] - Database-level type of a value or column
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization
//! - `rusqlite` - Implement `rusqlite::ToSql` for [`Value`]
//! - `chrono` - Convert chrono date/time types into [`Value`]
//! - `uuid` - Convert UUIDs into [`Value`]

mod dialect;
mod value;

pub use dialect::{
    BitOp, BitSyntax, BitwiseSupport, Dialect, DialectKind, DialectParseError, Naming, Paging,
    PlaceholderStyle, SubstringStyle,
};
pub use value::{DbType, Value};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{DbType, Dialect, DialectKind, Value};
}
