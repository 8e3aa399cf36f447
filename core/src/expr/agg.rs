//! Type-safe aggregate functions.
//!
//! # Type Safety
//!
//! - `sum`, `avg`: Require `Numeric` types
//! - `count`, `count_distinct`: Work with any type
//! - `min`, `max`: Work with any type and keep it
//!
//! GROUP BY rules are not checked. A projection mixing aggregates and
//! ungrouped columns is passed through as written.

use crate::types::{Numeric, SqlType};

use super::{Expr, IntoExpr, Method, Node};

fn aggregate<E: IntoExpr, T>(method: Method, expr: E) -> Expr<T> {
    Expr::from_node(Node::call(method, vec![expr.into_node()]))
}

// =============================================================================
// COUNT
// =============================================================================

/// COUNT(*) - counts all rows.
///
/// ```ignore
/// use ormlite_core::expr::count_all;
///
/// let total = count_all();
/// // Generates: COUNT(*)
/// ```
pub fn count_all() -> Expr<i64> {
    Expr::from_node(Node::call(Method::CountAll, Vec::new()))
}

/// COUNT(expr) - counts non-null values.
pub fn count<E: IntoExpr>(expr: E) -> Expr<i64> {
    aggregate(Method::Count, expr)
}

/// COUNT(DISTINCT expr).
pub fn count_distinct<E: IntoExpr>(expr: E) -> Expr<i64> {
    aggregate(Method::CountDistinct, expr)
}

// =============================================================================
// SUM / AVG
// =============================================================================

/// SUM(expr).
///
/// Nullable: an empty group sums to NULL.
pub fn sum<E>(expr: E) -> Expr<Option<f64>>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Numeric>,
{
    aggregate(Method::Sum, expr)
}

/// AVG(expr).
pub fn avg<E>(expr: E) -> Expr<Option<f64>>
where
    E: IntoExpr,
    E::Type: SqlType<Family = Numeric>,
{
    aggregate(Method::Avg, expr)
}

// =============================================================================
// MIN / MAX
// =============================================================================

/// MIN(expr).
pub fn min<E: IntoExpr>(expr: E) -> Expr<E::Type> {
    aggregate(Method::Min, expr)
}

/// MAX(expr).
pub fn max<E: IntoExpr>(expr: E) -> Expr<E::Type> {
    aggregate(Method::Max, expr)
}
