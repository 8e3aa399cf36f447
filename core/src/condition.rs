//! Compiled intermediate representation.
//!
//! The walker lowers [`Node`](crate::expr::Node) trees into [`Condition`]s and
//! [`Scalar`]s. Every column here is already resolved to a join-graph slot and
//! every literal is already bound, so rendering is a straight serialization.
//! `And`/`Or` operands are always parenthesized on render; precedence lives in
//! the tree shape.

use ormlite_types::{BitOp, DbType};

use crate::param::ParamId;
use crate::query::QueryState;
use crate::schema::ColumnDef;

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The operator selecting exactly the rows this one rejects (ignoring NULLs).
    pub const fn negate(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Ge => CompareOp::Lt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Bit(BitOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Upper,
    Lower,
    Trim,
    LTrim,
    RTrim,
    Length,
    Count,
    CountDistinct,
    Sum,
    Min,
    Max,
    Avg,
    Coalesce,
}

// =============================================================================
// Raw fragments
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RawPart {
    Text(String),
    Param(ParamId),
    /// Comma-separated parameters from an expanded list argument
    List(Vec<ParamId>),
    /// Stand-in for an empty list argument
    Null,
}

/// Caller-written SQL with its `{n}` arguments already bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSql {
    pub parts: Vec<RawPart>,
}

impl RawSql {
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            parts: vec![RawPart::Text(sql.into())],
        }
    }
}

// =============================================================================
// Scalars and conditions
// =============================================================================

/// A compiled value expression.
#[derive(Debug, Clone)]
pub enum Scalar {
    Column {
        slot: usize,
        column: &'static ColumnDef,
    },
    Param(ParamId),
    Null,
    /// Dialect boolean literal
    Bool(bool),
    /// Inline integer literal
    Number(i64),
    /// `*`
    Star,
    /// Dialect random function
    Random,
    Neg(Box<Scalar>),
    Binary {
        op: ArithOp,
        left: Box<Scalar>,
        right: Box<Scalar>,
    },
    Func {
        func: Func,
        args: Vec<Scalar>,
    },
    /// 1-based start
    Substring {
        expr: Box<Scalar>,
        start: Box<Scalar>,
        len: Option<Box<Scalar>>,
    },
    Cast {
        expr: Box<Scalar>,
        ty: DbType,
    },
    Case {
        when: Box<Condition>,
        then: Box<Scalar>,
        otherwise: Box<Scalar>,
    },
    /// A condition used as a value
    Predicate(Box<Condition>),
    Raw(RawSql),
    Subquery(Box<QueryState>),
}

/// A compiled boolean expression.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `(1=1)` or `(1=0)`
    Constant(bool),
    Compare {
        left: Scalar,
        op: CompareOp,
        right: Scalar,
    },
    Like {
        expr: Scalar,
        pattern: Scalar,
        escape: Option<char>,
        negated: bool,
    },
    /// An empty `values` renders `IN (NULL)`
    In {
        expr: Scalar,
        values: Vec<Scalar>,
        negated: bool,
    },
    InQuery {
        expr: Scalar,
        query: Box<QueryState>,
        negated: bool,
    },
    Exists {
        query: Box<QueryState>,
        negated: bool,
    },
    IsNull {
        expr: Scalar,
        negated: bool,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
    Raw(RawSql),
}

impl Condition {
    pub fn combine(self, op: Logical, other: Condition) -> Condition {
        match op {
            Logical::And => Condition::And(Box::new(self), Box::new(other)),
            Logical::Or => Condition::Or(Box::new(self), Box::new(other)),
        }
    }

    /// ANDs optional conditions together, skipping absent ones.
    pub fn all<I>(conditions: I) -> Option<Condition>
    where
        I: IntoIterator<Item = Condition>,
    {
        conditions
            .into_iter()
            .reduce(|acc, next| acc.combine(Logical::And, next))
    }

    /// Logical negation, pushed into the leaf where SQL has a direct form.
    pub fn negate(self) -> Condition {
        match self {
            Condition::Constant(b) => Condition::Constant(!b),
            // `flag = true` becomes `flag = false`, never `flag <> true`
            Condition::Compare {
                left,
                op: op @ (CompareOp::Eq | CompareOp::Ne),
                right: Scalar::Bool(b),
            } => Condition::Compare {
                left,
                op,
                right: Scalar::Bool(!b),
            },
            Condition::Compare { left, op, right } => Condition::Compare {
                left,
                op: op.negate(),
                right,
            },
            Condition::Like {
                expr,
                pattern,
                escape,
                negated,
            } => Condition::Like {
                expr,
                pattern,
                escape,
                negated: !negated,
            },
            Condition::In {
                expr,
                values,
                negated,
            } => {
                // NOT IN over nothing keeps every row
                if values.is_empty() && !negated {
                    Condition::Constant(true)
                } else {
                    Condition::In {
                        expr,
                        values,
                        negated: !negated,
                    }
                }
            }
            Condition::InQuery {
                expr,
                query,
                negated,
            } => Condition::InQuery {
                expr,
                query,
                negated: !negated,
            },
            Condition::Exists { query, negated } => Condition::Exists {
                query,
                negated: !negated,
            },
            Condition::IsNull { expr, negated } => Condition::IsNull {
                expr,
                negated: !negated,
            },
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    /// Visits every query embedded in this condition, outermost first.
    pub fn for_each_query_mut(&mut self, f: &mut dyn FnMut(&mut QueryState)) {
        match self {
            Condition::Constant(_) | Condition::Raw(_) => {}
            Condition::Compare { left, right, .. } => {
                left.for_each_query_mut(f);
                right.for_each_query_mut(f);
            }
            Condition::Like { expr, pattern, .. } => {
                expr.for_each_query_mut(f);
                pattern.for_each_query_mut(f);
            }
            Condition::In { expr, values, .. } => {
                expr.for_each_query_mut(f);
                for v in values {
                    v.for_each_query_mut(f);
                }
            }
            Condition::InQuery { expr, query, .. } => {
                expr.for_each_query_mut(f);
                f(query);
            }
            Condition::Exists { query, .. } => f(query),
            Condition::IsNull { expr, .. } => expr.for_each_query_mut(f),
            Condition::And(l, r) | Condition::Or(l, r) => {
                l.for_each_query_mut(f);
                r.for_each_query_mut(f);
            }
            Condition::Not(inner) => inner.for_each_query_mut(f),
        }
    }
}

impl Scalar {
    pub fn column(slot: usize, column: &'static ColumnDef) -> Self {
        Scalar::Column { slot, column }
    }

    pub fn func(func: Func, args: Vec<Scalar>) -> Self {
        Scalar::Func { func, args }
    }

    /// Visits every query embedded in this scalar, outermost first.
    pub fn for_each_query_mut(&mut self, f: &mut dyn FnMut(&mut QueryState)) {
        match self {
            Scalar::Column { .. }
            | Scalar::Param(_)
            | Scalar::Null
            | Scalar::Bool(_)
            | Scalar::Number(_)
            | Scalar::Star
            | Scalar::Random
            | Scalar::Raw(_) => {}
            Scalar::Neg(inner) | Scalar::Cast { expr: inner, .. } => inner.for_each_query_mut(f),
            Scalar::Binary { left, right, .. } => {
                left.for_each_query_mut(f);
                right.for_each_query_mut(f);
            }
            Scalar::Func { args, .. } => {
                for arg in args {
                    arg.for_each_query_mut(f);
                }
            }
            Scalar::Substring { expr, start, len } => {
                expr.for_each_query_mut(f);
                start.for_each_query_mut(f);
                if let Some(len) = len {
                    len.for_each_query_mut(f);
                }
            }
            Scalar::Case {
                when,
                then,
                otherwise,
            } => {
                when.for_each_query_mut(f);
                then.for_each_query_mut(f);
                otherwise.for_each_query_mut(f);
            }
            Scalar::Predicate(c) => c.for_each_query_mut(f),
            Scalar::Subquery(q) => f(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_comparisons() {
        let cond = Condition::Compare {
            left: Scalar::Number(1),
            op: CompareOp::Lt,
            right: Scalar::Number(2),
        };
        assert!(matches!(
            cond.negate(),
            Condition::Compare {
                op: CompareOp::Ge,
                ..
            }
        ));
    }

    #[test]
    fn negated_flag_compares_with_false() {
        let cond = Condition::Compare {
            left: Scalar::Number(1),
            op: CompareOp::Eq,
            right: Scalar::Bool(true),
        };
        assert!(matches!(
            cond.negate(),
            Condition::Compare {
                op: CompareOp::Eq,
                right: Scalar::Bool(false),
                ..
            }
        ));
    }

    #[test]
    fn negated_empty_in_keeps_every_row() {
        let cond = Condition::In {
            expr: Scalar::Number(1),
            values: Vec::new(),
            negated: false,
        };
        assert!(matches!(cond.negate(), Condition::Constant(true)));
    }

    #[test]
    fn double_negation_cancels() {
        let inner = Condition::Raw(RawSql::text("x"));
        let twice = Condition::Not(Box::new(inner)).negate();
        assert!(matches!(twice, Condition::Raw(_)));
    }

    #[test]
    fn all_skips_nothing_and_handles_empty() {
        assert!(Condition::all(Vec::new()).is_none());
        let both = Condition::all([Condition::Constant(true), Condition::Constant(false)]);
        assert!(matches!(both, Some(Condition::And(..))));
    }
}
