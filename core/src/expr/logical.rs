//! Logical operators (AND, OR, NOT).
//!
//! This module provides both function-based and operator-based logical operations:
//!
//! ```ignore
//! // Function style
//! and2(condition1, condition2)
//! or([c1, c2, c3])
//! not(condition)
//!
//! // Operator style (via std::ops traits, boolean operands only)
//! condition1 & condition2   // BitAnd
//! condition1 | condition2   // BitOr
//! !condition                // Not
//! ```

use ormlite_types::Value;

use crate::types::{Boolean, SqlType};

use super::{BinaryOp, Expr, IntoExpr, Node, UnaryOp};

// =============================================================================
// NOT
// =============================================================================

/// Logical NOT.
///
/// Negating a boolean column renders `col = <false>` rather than a `NOT`
/// token. Negated comparisons flip their operator.
pub fn not<E>(expr: E) -> Expr<bool>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Boolean>,
{
    Expr::from_node(Node::unary(UnaryOp::Not, expr.into_node()))
}

// =============================================================================
// AND
// =============================================================================

/// Logical AND of two conditions.
pub fn and2<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: SqlType<Family = Boolean>,
    R::Type: SqlType<Family = Boolean>,
{
    Expr::from_node(Node::binary(
        BinaryOp::And,
        left.into_node(),
        right.into_node(),
    ))
}

/// Logical AND of any number of conditions.
///
/// An empty input is a constant `true`.
pub fn and<I>(conditions: I) -> Expr<bool>
where
    I: IntoIterator<Item = Expr<bool>>,
{
    fold(conditions, BinaryOp::And, true)
}

// =============================================================================
// OR
// =============================================================================

/// Logical OR of two conditions.
pub fn or2<L, R>(left: L, right: R) -> Expr<bool>
where
    L: IntoExpr,
    R: IntoExpr,
    L::Type: SqlType<Family = Boolean>,
    R::Type: SqlType<Family = Boolean>,
{
    Expr::from_node(Node::binary(
        BinaryOp::Or,
        left.into_node(),
        right.into_node(),
    ))
}

/// Logical OR of any number of conditions.
///
/// An empty input is a constant `false`.
pub fn or<I>(conditions: I) -> Expr<bool>
where
    I: IntoIterator<Item = Expr<bool>>,
{
    fold(conditions, BinaryOp::Or, false)
}

fn fold<I>(conditions: I, op: BinaryOp, empty: bool) -> Expr<bool>
where
    I: IntoIterator<Item = Expr<bool>>,
{
    let node = conditions
        .into_iter()
        .map(Expr::into_node)
        .reduce(|acc, next| Node::binary(op, acc, next))
        .unwrap_or(Node::Constant(Value::Bool(empty)));
    Expr::from_node(node)
}
