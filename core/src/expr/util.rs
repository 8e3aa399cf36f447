//! Utility expressions (alias, cast, raw SQL, values, records).

use std::borrow::Cow;

use ormlite_types::Value;

use crate::param::ParamRef;
use crate::schema::Columns;
use crate::types::{Record, Row, SqlType};

use super::{Aliased, Expr, IntoExpr, IntoProjection, Method, Node};

// =============================================================================
// ALIAS
// =============================================================================

/// Create an aliased expression.
///
/// ```ignore
/// use ormlite_core::expr::{alias, count_all};
///
/// // SELECT COUNT(*) AS "Total"
/// query.select(|_| alias(count_all(), "Total"));
/// ```
pub fn alias<E: IntoExpr>(expr: E, name: impl Into<Cow<'static, str>>) -> Aliased {
    Expr::<E::Type>::from_node(expr.into_node()).alias(name)
}

// =============================================================================
// CAST
// =============================================================================

/// CAST to the SQL type of `T`, using the dialect's type name.
///
/// ```ignore
/// // SELECT CAST("Age" AS TEXT)
/// cast::<String, _>(p.age)
/// ```
pub fn cast<T: SqlType, E: IntoExpr>(expr: E) -> Expr<T> {
    Expr::from_node(Node::call(Method::Cast(T::DB_TYPE), vec![expr.into_node()]))
}

// =============================================================================
// RAW SQL
// =============================================================================

/// Caller-written SQL, copied into the statement verbatim.
///
/// Nothing inside is quoted, validated or parameterized.
pub fn custom<T>(sql: impl Into<String>) -> Expr<T> {
    Expr::from_node(Node::Raw(sql.into()))
}

// =============================================================================
// VALUES
// =============================================================================

/// A literal value as an expression.
///
/// Useful when a plain value has to stand on the left of an operator.
pub fn value<T>(value: T) -> Expr<T>
where
    T: SqlType + Into<Value>,
{
    Expr::from_node(Node::Constant(value.into()))
}

/// A parameter registered on the query with `add_param`.
pub fn param<T: SqlType>(param: ParamRef) -> Expr<T> {
    Expr::from_node(Node::Param(param))
}

// =============================================================================
// ROWS AND RECORDS
// =============================================================================

/// Every column of one table registration.
///
/// Projected with `alias`, each column is emitted as `"<alias><Column>"`.
/// Used as a GROUP BY key, it groups by the whole row.
pub fn all<C: Columns>(columns: C) -> Expr<Row> {
    Expr::from_node(Node::Row(columns.row()))
}

/// An anonymous composite of named members.
///
/// Projected or grouped, a record spreads into its members. Member names
/// become output aliases in SELECT and are dropped in GROUP BY.
pub fn record<P: IntoProjection>(members: P) -> Expr<Record> {
    Expr::from_node(Node::New(members.into_members()))
}

/// Member access on a record.
///
/// Folded away when the record is built from constants.
pub fn field<T>(record: Expr<Record>, name: impl Into<Cow<'static, str>>) -> Expr<T> {
    Expr::from_node(Node::Member {
        object: Box::new(record.into_node()),
        name: name.into(),
    })
}

