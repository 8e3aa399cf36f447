//! Conditional expressions.
//!
//! `iif(test, then, otherwise)` renders a searched `CASE WHEN .. THEN .. ELSE .. END`.
//! When `test` folds to a constant the branch is picked at compile time and no
//! CASE is emitted.
//!
//! ```ignore
//! use ormlite_core::expr::*;
//!
//! // CASE WHEN "Age" > @0 THEN @1 ELSE @2 END
//! iif(gt(p.age, 65), "Senior", "Adult")
//! ```

use crate::types::{Boolean, Compatible, SqlType};

use super::{Expr, IntoExpr, Node};

/// Searched CASE with a single WHEN branch and an ELSE.
pub fn iif<C, T, O>(test: C, then: T, otherwise: O) -> Expr<T::Type>
where
    C: IntoExpr,
    C::Type: SqlType<Family = Boolean>,
    T: IntoExpr,
    O: IntoExpr,
    T::Type: Compatible<O::Type>,
{
    Expr::from_node(Node::Conditional {
        test: Box::new(test.into_node()),
        then: Box::new(then.into_node()),
        otherwise: Box::new(otherwise.into_node()),
    })
}
