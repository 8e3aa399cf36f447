//! Set operations (IN, NOT IN, EXISTS, NOT EXISTS).

use ormlite_types::Value;

use crate::query::IntoSubquery;
use crate::types::{Compatible, SqlType};

use super::{Expr, IntoExpr, Method, Node, UnaryOp};

// =============================================================================
// IN List
// =============================================================================

/// IN list check.
///
/// Each element is bound as its own parameter. An empty list renders
/// `IN (NULL)`, which matches no row.
pub fn in_list<E, I, R>(expr: E, values: I) -> Expr<bool>
where
    E: IntoExpr,
    I: IntoIterator<Item = R>,
    R: SqlType + Into<Value>,
    E::Type: Compatible<R>,
{
    let values = values.into_iter().map(Into::into).collect();
    Expr::from_node(Node::call(
        Method::In,
        vec![expr.into_node(), Node::List(values)],
    ))
}

/// NOT IN list check.
///
/// An empty list matches every row.
pub fn not_in_list<E, I, R>(expr: E, values: I) -> Expr<bool>
where
    E: IntoExpr,
    I: IntoIterator<Item = R>,
    R: SqlType + Into<Value>,
    E::Type: Compatible<R>,
{
    let node = in_list(expr, values).into_node();
    Expr::from_node(Node::unary(UnaryOp::Not, node))
}

// =============================================================================
// Subqueries
// =============================================================================

/// IN subquery check.
///
/// The subquery's parameters are renamed into the outer query's namespace
/// when the expression is compiled.
pub fn in_query<E, Q>(expr: E, query: Q) -> Expr<bool>
where
    E: IntoExpr,
    Q: IntoSubquery,
{
    Expr::from_node(Node::call(
        Method::InQuery,
        vec![expr.into_node(), Node::Subquery(Box::new(query.into_state()))],
    ))
}

/// NOT IN subquery check.
pub fn not_in_query<E, Q>(expr: E, query: Q) -> Expr<bool>
where
    E: IntoExpr,
    Q: IntoSubquery,
{
    let node = in_query(expr, query).into_node();
    Expr::from_node(Node::unary(UnaryOp::Not, node))
}

/// EXISTS check.
pub fn exists<Q: IntoSubquery>(query: Q) -> Expr<bool> {
    Expr::from_node(Node::call(
        Method::Exists,
        vec![Node::Subquery(Box::new(query.into_state()))],
    ))
}

/// NOT EXISTS check.
pub fn not_exists<Q: IntoSubquery>(query: Q) -> Expr<bool> {
    let node = exists(query).into_node();
    Expr::from_node(Node::unary(UnaryOp::Not, node))
}
