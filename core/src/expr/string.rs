//! Type-safe string functions.
//!
//! These functions require `Textual` operands and provide compile-time
//! enforcement of string operations.
//!
//! # Type Safety
//!
//! - `contains`, `starts_with`, `ends_with`, `equals`: Require `Textual` on both sides
//! - `upper`, `lower`, `trim`: Require `Textual` types, preserve nullability
//! - `length`: Returns `i64` from `Textual` input
//! - `to_text`: Accepts any type
//!
//! # Wildcards
//!
//! The needle given to `contains`, `starts_with` and `ends_with` is literal
//! text. `%`, `_`, the escape character and (outside Oracle) backslash are
//! escaped before binding, so a stored `50%` is found by `contains(col, "50%")`
//! and nothing else.

use crate::types::{SqlType, Textual};

use super::{Expr, IntoExpr, Method, Node};

fn text_call<E: IntoExpr, T>(method: Method, expr: E) -> Expr<T> {
    Expr::from_node(Node::call(method, vec![expr.into_node()]))
}

fn pattern<E: IntoExpr, N: IntoExpr>(method: Method, expr: E, needle: N) -> Expr<bool> {
    Expr::from_node(Node::call(method, vec![expr.into_node(), needle.into_node()]))
}

// =============================================================================
// PATTERN MATCHING
// =============================================================================

/// Substring match, rendered `UPPER(col) LIKE UPPER(@p) ESCAPE '^'`.
///
/// # Type Safety
///
/// ```ignore
/// // OK: Text column
/// contains(person.name, "ann");
///
/// // Compile error: i64 is not Textual
/// contains(person.id, "1");
/// ```
pub fn contains<E, N>(expr: E, needle: N) -> Expr<bool>
where
    E: IntoExpr,
    N: IntoExpr,
    E::Type: SqlType<Family = Textual>,
    N::Type: SqlType<Family = Textual>,
{
    pattern(Method::Contains, expr, needle)
}

/// Prefix match.
pub fn starts_with<E, N>(expr: E, needle: N) -> Expr<bool>
where
    E: IntoExpr,
    N: IntoExpr,
    E::Type: SqlType<Family = Textual>,
    N::Type: SqlType<Family = Textual>,
{
    pattern(Method::StartsWith, expr, needle)
}

/// Suffix match.
pub fn ends_with<E, N>(expr: E, needle: N) -> Expr<bool>
where
    E: IntoExpr,
    N: IntoExpr,
    E::Type: SqlType<Family = Textual>,
    N::Type: SqlType<Family = Textual>,
{
    pattern(Method::EndsWith, expr, needle)
}

/// Plain string equality.
///
/// Same as [`eq`](super::eq) but restricted to text.
pub fn equals<E, N>(expr: E, other: N) -> Expr<bool>
where
    E: IntoExpr,
    N: IntoExpr,
    E::Type: SqlType<Family = Textual>,
    N::Type: SqlType<Family = Textual>,
{
    pattern(Method::Equals, expr, other)
}

// =============================================================================
// CASE CONVERSION
// =============================================================================

/// UPPER - converts string to uppercase.
///
/// Preserves the nullability of the input expression.
pub fn upper<E>(expr: E) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::Upper, expr)
}

/// LOWER - converts string to lowercase.
pub fn lower<E>(expr: E) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::Lower, expr)
}

// =============================================================================
// TRIM FUNCTIONS
// =============================================================================

/// TRIM - removes leading and trailing whitespace.
pub fn trim<E>(expr: E) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::Trim, expr)
}

/// LTRIM - removes leading whitespace.
pub fn ltrim<E>(expr: E) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::LTrim, expr)
}

/// RTRIM - removes trailing whitespace.
pub fn rtrim<E>(expr: E) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::RTrim, expr)
}

// =============================================================================
// STRING PROPERTIES
// =============================================================================

/// LENGTH - character count.
pub fn length<E>(expr: E) -> Expr<i64>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    text_call(Method::Length, expr)
}

/// Substring starting at the 0-based `start`, optionally limited to `len`
/// characters.
///
/// Rendered per dialect as `SUBSTRING(x FROM s FOR n)`, `SUBSTR(x, s, n)` or
/// `SUBSTRING(x, s, n)` with a 1-based start.
pub fn substring<E>(expr: E, start: i64, len: Option<i64>) -> Expr<E::Type>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Textual>,
{
    let mut args = vec![expr.into_node(), start.into_node()];
    if let Some(len) = len {
        args.push(len.into_node());
    }
    Expr::from_node(Node::call(Method::Substring, args))
}

// =============================================================================
// CONVERSION
// =============================================================================

/// CAST to the dialect's text type.
pub fn to_text<E: IntoExpr>(expr: E) -> Expr<String> {
    Expr::from_node(Node::call(
        Method::Cast(ormlite_types::DbType::Text),
        vec![expr.into_node()],
    ))
}
