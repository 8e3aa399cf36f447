//! Rust-to-SQL type mapping for compile-time checked expressions.
//!
//! Every Rust type that can appear as a column or a literal implements
//! [`SqlType`]. Its `Family` is a zero-sized marker used to decide whether two
//! operands may be compared: all numbers share [`Numeric`], so an `i64` column
//! compares with an `i32` literal, while comparing a number with text fails to
//! compile.
//!
//! # Type Hierarchy
//!
//! ```text
//! SqlType
//! ├── Numeric   (i8..i64, u8..u32, f32, f64)
//! │   └── Integral (integers only, bitwise operators)
//! ├── Textual   (String, &str, char)
//! ├── Boolean   (bool)
//! ├── Binary    (Vec<u8>)
//! ├── Temporal  (chrono types)
//! ├── Identifier (uuid::Uuid)
//! └── <enum>    (each `sql_enum!` type is its own family)
//! ```

use ormlite_types::DbType;

// =============================================================================
// Families
// =============================================================================

/// Integers and floating point numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Numeric;

/// Text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Textual;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Boolean;

/// Raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary;

/// Dates and timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Temporal;

/// UUIDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identifier;

// =============================================================================
// SqlType
// =============================================================================

/// A Rust type with a SQL representation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no SQL representation",
    label = "use a primitive, String, Vec<u8>, an `sql_enum!` type, or an Option of one"
)]
pub trait SqlType: 'static {
    /// Comparison family
    type Family: 'static;
    const DB_TYPE: DbType;
    const NULLABLE: bool = false;
}

/// Integer types, the operands of bitwise operators.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an integer SQL type",
    label = "bitwise operators require an integer column"
)]
pub trait Integral: SqlType<Family = Numeric> {}

impl<T: SqlType> SqlType for Option<T> {
    type Family = T::Family;
    const DB_TYPE: DbType = T::DB_TYPE;
    const NULLABLE: bool = true;
}

impl<T: Integral> Integral for Option<T> {}

macro_rules! sql_type {
    ($family:ident, $db:ident: $($t:ty),+) => {
        $(
            impl SqlType for $t {
                type Family = $family;
                const DB_TYPE: DbType = DbType::$db;
            }
        )+
    };
}

sql_type!(Numeric, Integer: i8, i16, i32, i64, u8, u16, u32);
sql_type!(Numeric, Real: f32, f64);
sql_type!(Textual, Text: String, char);
sql_type!(Boolean, Boolean: bool);
sql_type!(Binary, Blob: Vec<u8>);

#[cfg(feature = "chrono")]
sql_type!(Temporal, Text: chrono::NaiveDate, chrono::NaiveDateTime, chrono::DateTime<chrono::Utc>);

#[cfg(feature = "uuid")]
sql_type!(Identifier, Text: uuid::Uuid);

/// Marker for an expression that expands to every column of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Row;

/// Marker for an anonymous composite built with `util::record`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Record;

/// An enum stored either by member name or by ordinal.
///
/// Implemented by the `sql_enum!` macro.
pub trait SqlEnum: Copy + 'static {
    fn name(&self) -> &'static str;
    fn ordinal(&self) -> i64;
}

/// Two SQL types that may be compared or combined.
///
/// Types are compatible when they share a family, so any two numeric types
/// are compatible while a number and text are not.
#[diagnostic::on_unimplemented(
    message = "SQL type `{Self}` is not compatible with `{Rhs}`",
    label = "these types cannot be compared",
    note = "numbers compare with numbers, text with text, and each enum with itself"
)]
pub trait Compatible<Rhs: SqlType>: SqlType {}

impl<L: SqlType, R: SqlType<Family = L::Family>> Compatible<R> for L {}

/// Types accepting `&` and `|`: logical on booleans, bitwise on integers.
#[diagnostic::on_unimplemented(
    message = "`&` and `|` are not defined for SQL type `{Self}`",
    label = "use boolean or integer operands"
)]
pub trait Conjunctive: SqlType {
    const BITWISE: bool;
}

impl Conjunctive for bool {
    const BITWISE: bool = false;
}

impl<T: Conjunctive> Conjunctive for Option<T> {
    const BITWISE: bool = T::BITWISE;
}

macro_rules! bitwise {
    ($($t:ty),+) => {
        $(
            impl Integral for $t {}

            impl Conjunctive for $t {
                const BITWISE: bool = true;
            }
        )+
    };
}

bitwise!(i8, i16, i32, i64, u8, u16, u32);
