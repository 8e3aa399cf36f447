//! Type-safe comparison functions.
//!
//! These functions enforce type compatibility at compile time through the
//! [`Compatible`] constraint. Comparing incompatible types
//! (e.g., `eq(person.age, "text")`) fails to compile.
//!
//! # Type Safety
//!
//! - `eq`, `ne`, `gt`, `gte`, `lt`, `lte`: Require compatible types
//! - `like`, `not_like`: Require textual types on both sides
//! - `between`: Requires expr compatible with both bounds
//! - `is_null`, `is_not_null`: No type constraint (any type can be null-checked)
//!
//! Operand order is preserved, so `lte(cutoff, q.date)` renders with the
//! constant on the left.

use crate::types::{Compatible, Textual};

use super::{BinaryOp, Expr, IntoExpr, Method, Node, UnaryOp};

// =============================================================================
// Internal Helper
// =============================================================================

fn compare<L: IntoExpr, R: IntoExpr>(left: L, op: BinaryOp, right: R) -> Expr<bool> {
    Expr::from_node(Node::binary(op, left.into_node(), right.into_node()))
}

// =============================================================================
// Equality Comparisons
// =============================================================================

/// Equality comparison (`=`).
///
/// Comparing with a `None` constant renders `IS NULL`.
///
/// ```ignore
/// // OK: i64 column compared with i32 literal (numeric family)
/// eq(person.id, 10);
///
/// // Compile error: a number cannot be compared with text
/// eq(person.id, "hello");
/// ```
pub fn eq<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Eq, right)
}

/// Inequality comparison (`<>`).
pub fn ne<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Ne, right)
}

// =============================================================================
// Ordering Comparisons
// =============================================================================

/// Greater-than comparison (`>`).
pub fn gt<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Gt, right)
}

/// Greater-than-or-equal comparison (`>=`).
pub fn gte<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Ge, right)
}

/// Less-than comparison (`<`).
pub fn lt<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Lt, right)
}

/// Less-than-or-equal comparison (`<=`).
pub fn lte<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: Compatible<R::Type>,
{
    compare(left, BinaryOp::Le, right)
}

/// `BETWEEN`, expressed as `expr >= low AND expr <= high`.
pub fn between<E, L, H>(expr: E, low: L, high: H) -> Expr<bool>
where
    E: IntoExpr,
    L: IntoExpr,
    H: IntoExpr,
    E::Type: Compatible<L::Type> + Compatible<H::Type>,
{
    let node = expr.into_node();
    let lower = Node::binary(BinaryOp::Ge, node.clone(), low.into_node());
    let upper = Node::binary(BinaryOp::Le, node, high.into_node());
    Expr::from_node(Node::binary(BinaryOp::And, lower, upper))
}

// =============================================================================
// Pattern Matching
// =============================================================================

/// `LIKE` with a caller-written pattern.
///
/// Wildcards in `pattern` are passed through untouched. Use
/// [`contains`](super::contains) and friends to match literal text.
pub fn like<L, R>(left: L, pattern: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: crate::types::SqlType<Family = Textual>,
    R::Type: crate::types::SqlType<Family = Textual>,
{
    Expr::from_node(Node::call(
        Method::Like,
        vec![left.into_node(), pattern.into_node()],
    ))
}

/// `NOT LIKE` with a caller-written pattern.
pub fn not_like<L, R>(left: L, pattern: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: crate::types::SqlType<Family = Textual>,
    R::Type: crate::types::SqlType<Family = Textual>,
{
    let node = like(left, pattern).into_node();
    Expr::from_node(Node::unary(UnaryOp::Not, node))
}

// =============================================================================
// Null Checks
// =============================================================================

/// `IS NULL`.
pub fn is_null<E: IntoExpr>(expr: E) -> Expr<bool> {
    Expr::from_node(Node::binary(
        BinaryOp::Eq,
        expr.into_node(),
        Node::Constant(ormlite_types::Value::Null),
    ))
}

/// `IS NOT NULL`.
pub fn is_not_null<E: IntoExpr>(expr: E) -> Expr<bool> {
    Expr::from_node(Node::binary(
        BinaryOp::Ne,
        expr.into_node(),
        Node::Constant(ormlite_types::Value::Null),
    ))
}
