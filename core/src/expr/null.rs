//! NULL handling.
//!
//! # Type Safety
//!
//! - `coalesce`: Requires compatible types between expression and fallback

use crate::types::Compatible;

use super::{Expr, IntoExpr, Method, Node};

/// COALESCE(expr, fallback).
///
/// The result takes the fallback's type, so `coalesce(row.flag, false)`
/// on an `Option<bool>` column is a plain `bool` predicate. Used in a filter it
/// renders `COALESCE(col, <false>) = <true>`, selecting rows where the column
/// is true and excluding both false and NULL.
///
/// ```ignore
/// use ormlite_core::expr::coalesce;
///
/// // WHERE COALESCE("Active", 0) = 1
/// query.r#where(|t| coalesce(t.active, false))?;
/// ```
pub fn coalesce<E, F>(expr: E, fallback: F) -> Expr<F::Type>
where
    E: IntoExpr,
    F: IntoExpr,
    E::Type: Compatible<F::Type>,
{
    Expr::from_node(Node::call(
        Method::Coalesce,
        vec![expr.into_node(), fallback.into_node()],
    ))
}
