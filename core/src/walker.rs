//! Expression tree walker.
//!
//! Lowers typed expression trees into [`Condition`]s, [`Scalar`]s and select
//! items. Each entry point folds constants first and then pattern-matches
//! exhaustively over [`Node`]. Literals are bound into the query's
//! [`ParamBinder`] as they are met, so parameter names follow source order.

use std::borrow::Cow;

use ormlite_types::{BitOp, DbType, Dialect, Value};

use crate::condition::{ArithOp, CompareOp, Condition, Func, Logical, RawSql, Scalar};
use crate::config::Config;
use crate::error::{OrmLiteError, Result};
use crate::eval;
use crate::expr::{BinaryOp, Member, Method, Node, UnaryOp};
use crate::join::JoinGraph;
use crate::param::ParamBinder;
use crate::query::{QueryState, SelectItem};
use crate::schema::{ColumnDef, ColumnRef, RowRef, Slot};

pub struct Walker<'a> {
    graph: &'a JoinGraph,
    binder: &'a mut ParamBinder,
    dialect: &'a Dialect,
    config: &'a Config,
}

impl<'a> Walker<'a> {
    pub fn new(
        graph: &'a JoinGraph,
        binder: &'a mut ParamBinder,
        dialect: &'a Dialect,
        config: &'a Config,
    ) -> Self {
        Self {
            graph,
            binder,
            dialect,
            config,
        }
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Compiles a boolean expression.
    pub fn predicate(&mut self, node: Node) -> Result<Condition> {
        self.condition(eval::fold(node))
    }

    /// Compiles a value expression.
    pub fn value(&mut self, node: Node) -> Result<Scalar> {
        self.scalar(eval::fold(node))
    }

    /// Compiles a SELECT list. Rows and records spread into their columns.
    pub fn projection(&mut self, members: Vec<Member>) -> Result<Vec<SelectItem>> {
        let mut items = Vec::with_capacity(members.len());
        for member in members {
            self.project(member.name, eval::fold(member.value), &mut items)?;
        }
        Ok(items)
    }

    /// Compiles GROUP BY or ORDER BY keys. Member names are discarded, so an
    /// aliased record never leaks its aliases into the clause.
    pub fn keys(&mut self, members: Vec<Member>) -> Result<Vec<Scalar>> {
        Ok(self
            .projection(members)?
            .into_iter()
            .map(|item| item.expr)
            .collect())
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    fn condition(&mut self, node: Node) -> Result<Condition> {
        match node {
            Node::Constant(Value::Bool(b)) => Ok(Condition::Constant(b)),
            Node::Constant(Value::Null) => Ok(Condition::Constant(false)),
            Node::Column(column) => {
                let (slot, def) = self.resolve(column)?;
                if def.ty != DbType::Boolean {
                    return Err(OrmLiteError::NotAPredicate(format!(
                        "column {}.{}",
                        column.table.declared, def.field
                    )));
                }
                Ok(is_true(Scalar::column(slot, def)))
            }
            Node::Param(param) => Ok(is_true(Scalar::Param(self.binder.resolve(param)?))),
            Node::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.negated(*operand),
            Node::Binary { op, left, right } if op.is_logical() => {
                let left = self.condition(*left)?;
                let right = self.condition(*right)?;
                Ok(left.combine(
                    if op == BinaryOp::And {
                        Logical::And
                    } else {
                        Logical::Or
                    },
                    right,
                ))
            }
            Node::Binary { op, left, right } if op.is_comparison() => {
                self.comparison(op, *left, *right)
            }
            Node::Call { method, args } => self.call_condition(method, args),
            node @ Node::Conditional { .. } => Ok(is_true(self.scalar(node)?)),
            Node::Raw(sql) => Ok(Condition::Raw(RawSql::text(sql))),
            Node::Member { name, .. } => Err(OrmLiteError::UnsupportedExpression(format!(
                "member access `{name}` on a non-constant value"
            ))),
            other => Err(OrmLiteError::NotAPredicate(other.describe())),
        }
    }

    /// Negation without a `NOT` token wherever SQL has a direct form.
    fn negated(&mut self, operand: Node) -> Result<Condition> {
        Ok(self.condition(operand)?.negate())
    }

    fn comparison(&mut self, op: BinaryOp, left: Node, right: Node) -> Result<Condition> {
        let compare = match op {
            BinaryOp::Eq => CompareOp::Eq,
            BinaryOp::Ne => CompareOp::Ne,
            BinaryOp::Lt => CompareOp::Lt,
            BinaryOp::Le => CompareOp::Le,
            BinaryOp::Gt => CompareOp::Gt,
            _ => CompareOp::Ge,
        };

        // x == NULL / x != NULL
        let right_null = matches!(right.as_constant(), Some(Value::Null));
        let left_null = matches!(left.as_constant(), Some(Value::Null));
        if right_null || left_null {
            let other = if right_null { left } else { right };
            return match compare {
                CompareOp::Eq => Ok(Condition::IsNull {
                    expr: self.scalar(other)?,
                    negated: false,
                }),
                CompareOp::Ne => Ok(Condition::IsNull {
                    expr: self.scalar(other)?,
                    negated: true,
                }),
                // ordering against NULL is never true
                _ => Ok(Condition::Constant(false)),
            };
        }

        Ok(Condition::Compare {
            left: self.scalar(left)?,
            op: compare,
            right: self.scalar(right)?,
        })
    }

    fn call_condition(&mut self, method: Method, args: Vec<Node>) -> Result<Condition> {
        let mut args = args.into_iter();
        match method {
            Method::Contains | Method::StartsWith | Method::EndsWith => {
                let (expr, needle) = (next(&mut args, method)?, next(&mut args, method)?);
                let Node::Constant(Value::Text(needle)) = needle else {
                    return Err(OrmLiteError::UnsupportedExpression(format!(
                        "{method:?} needs a constant text operand"
                    )));
                };
                let escaped = escape_wildcards(&needle, self.dialect);
                let pattern = match method {
                    Method::Contains => format!("%{escaped}%"),
                    Method::StartsWith => format!("{escaped}%"),
                    _ => format!("%{escaped}"),
                };
                let expr = self.scalar(expr)?;
                let pattern = Scalar::Param(self.binder.bind(Value::Text(pattern)));
                let (expr, pattern) = if self.config.strip_upper_in_like {
                    (expr, pattern)
                } else {
                    (
                        Scalar::func(Func::Upper, vec![expr]),
                        Scalar::func(Func::Upper, vec![pattern]),
                    )
                };
                Ok(Condition::Like {
                    expr,
                    pattern,
                    escape: Some(self.dialect.like_escape),
                    negated: false,
                })
            }
            Method::Like => {
                let expr = self.scalar(next(&mut args, method)?)?;
                let pattern = self.scalar(next(&mut args, method)?)?;
                Ok(Condition::Like {
                    expr,
                    pattern,
                    escape: None,
                    negated: false,
                })
            }
            Method::Equals => {
                let left = next(&mut args, method)?;
                let right = next(&mut args, method)?;
                self.comparison(BinaryOp::Eq, left, right)
            }
            Method::In => {
                let expr = self.scalar(next(&mut args, method)?)?;
                let values = match next(&mut args, method)? {
                    Node::List(values) => values
                        .into_iter()
                        .map(|v| Scalar::Param(self.binder.bind(v)))
                        .collect(),
                    other => {
                        return Err(OrmLiteError::UnsupportedExpression(format!(
                            "IN over {}",
                            other.describe()
                        )));
                    }
                };
                Ok(Condition::In {
                    expr,
                    values,
                    negated: false,
                })
            }
            Method::InQuery => {
                let expr = self.scalar(next(&mut args, method)?)?;
                let query = self.subquery(next(&mut args, method)?)?;
                Ok(Condition::InQuery {
                    expr,
                    query,
                    negated: false,
                })
            }
            Method::Exists => {
                let query = self.subquery(next(&mut args, method)?)?;
                Ok(Condition::Exists {
                    query,
                    negated: false,
                })
            }
            // a boolean-valued function used as a filter
            Method::Coalesce | Method::Min | Method::Max => {
                let node = Node::call(method, args.collect());
                Ok(is_true(self.scalar(node)?))
            }
            _ => Err(OrmLiteError::NotAPredicate(format!("call to {method:?}"))),
        }
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    fn scalar(&mut self, node: Node) -> Result<Scalar> {
        match node {
            Node::Constant(Value::Null) => Ok(Scalar::Null),
            Node::Constant(Value::Bool(b)) => Ok(Scalar::Bool(b)),
            Node::Constant(value) => Ok(Scalar::Param(self.binder.bind(value))),
            Node::Param(param) => Ok(Scalar::Param(self.binder.resolve(param)?)),
            Node::Column(column) => {
                let (slot, def) = self.resolve(column)?;
                Ok(Scalar::column(slot, def))
            }
            Node::Unary {
                op: UnaryOp::Neg,
                operand,
            } => Ok(Scalar::Neg(Box::new(self.scalar(*operand)?))),
            node @ (Node::Unary {
                op: UnaryOp::Not, ..
            }
            | Node::Binary {
                op:
                    BinaryOp::Eq
                    | BinaryOp::Ne
                    | BinaryOp::Lt
                    | BinaryOp::Le
                    | BinaryOp::Gt
                    | BinaryOp::Ge
                    | BinaryOp::And
                    | BinaryOp::Or,
                ..
            }) => Ok(Scalar::Predicate(Box::new(self.condition(node)?))),
            Node::Binary { op, left, right } => {
                let op = self.arith_op(op)?;
                Ok(Scalar::Binary {
                    op,
                    left: Box::new(self.scalar(*left)?),
                    right: Box::new(self.scalar(*right)?),
                })
            }
            Node::Call { method, args } => self.call_scalar(method, args),
            Node::Conditional {
                test,
                then,
                otherwise,
            } => Ok(Scalar::Case {
                when: Box::new(self.condition(*test)?),
                then: Box::new(self.scalar(*then)?),
                otherwise: Box::new(self.scalar(*otherwise)?),
            }),
            Node::Raw(sql) => Ok(Scalar::Raw(RawSql::text(sql))),
            node @ Node::Subquery(_) => Ok(Scalar::Subquery(self.subquery(node)?)),
            Node::Member { name, .. } => Err(OrmLiteError::UnsupportedExpression(format!(
                "member access `{name}` on a non-constant value"
            ))),
            other @ (Node::List(_) | Node::Row(_) | Node::New(_)) => Err(
                OrmLiteError::UnsupportedExpression(format!("{} used as a value", other.describe())),
            ),
        }
    }

    fn arith_op(&self, op: BinaryOp) -> Result<ArithOp> {
        let bit = match op {
            BinaryOp::Add => return Ok(ArithOp::Add),
            BinaryOp::Sub => return Ok(ArithOp::Sub),
            BinaryOp::Mul => return Ok(ArithOp::Mul),
            BinaryOp::Div => return Ok(ArithOp::Div),
            BinaryOp::Rem => return Ok(ArithOp::Rem),
            BinaryOp::BitAnd => BitOp::And,
            BinaryOp::BitOr => BitOp::Or,
            BinaryOp::BitXor => BitOp::Xor,
            BinaryOp::Shl => BitOp::Shl,
            BinaryOp::Shr => BitOp::Shr,
            other => {
                return Err(OrmLiteError::UnsupportedExpression(format!(
                    "{other:?} used as arithmetic"
                )));
            }
        };
        if !self.dialect.supports(bit) {
            return Err(OrmLiteError::UnsupportedOperator {
                op: bit,
                dialect: self.dialect.kind,
            });
        }
        Ok(ArithOp::Bit(bit))
    }

    fn call_scalar(&mut self, method: Method, args: Vec<Node>) -> Result<Scalar> {
        let func = match method {
            Method::Upper => Func::Upper,
            Method::Lower => Func::Lower,
            Method::Trim => Func::Trim,
            Method::LTrim => Func::LTrim,
            Method::RTrim => Func::RTrim,
            Method::Length => Func::Length,
            Method::Count => Func::Count,
            Method::CountDistinct => Func::CountDistinct,
            Method::Sum => Func::Sum,
            Method::Min => Func::Min,
            Method::Max => Func::Max,
            Method::Avg => Func::Avg,
            Method::Coalesce => Func::Coalesce,
            Method::CountAll => return Ok(Scalar::func(Func::Count, vec![Scalar::Star])),
            Method::Cast(ty) => {
                let expr = next(&mut args.into_iter(), method)?;
                return Ok(Scalar::Cast {
                    expr: Box::new(self.scalar(expr)?),
                    ty,
                });
            }
            Method::Substring => return self.substring(args),
            Method::Contains
            | Method::StartsWith
            | Method::EndsWith
            | Method::Like
            | Method::Equals
            | Method::In
            | Method::InQuery
            | Method::Exists => {
                let cond = self.call_condition(method, args)?;
                return Ok(Scalar::Predicate(Box::new(cond)));
            }
        };
        let args = args
            .into_iter()
            .map(|arg| self.scalar(arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Scalar::func(func, args))
    }

    /// Shifts the 0-based start to SQL's 1-based one.
    fn substring(&mut self, args: Vec<Node>) -> Result<Scalar> {
        let mut args = args.into_iter();
        let expr = self.scalar(next(&mut args, Method::Substring)?)?;
        let start = match next(&mut args, Method::Substring)? {
            Node::Constant(Value::Integer(i)) => Scalar::Number(i.saturating_add(1)),
            other => Scalar::Binary {
                op: ArithOp::Add,
                left: Box::new(self.scalar(other)?),
                right: Box::new(Scalar::Number(1)),
            },
        };
        let len = match args.next() {
            Some(Node::Constant(Value::Integer(n))) => Some(Box::new(Scalar::Number(n))),
            Some(other) => Some(Box::new(self.scalar(other)?)),
            None => None,
        };
        Ok(Scalar::Substring {
            expr: Box::new(expr),
            start: Box::new(start),
            len,
        })
    }

    // =========================================================================
    // Projection
    // =========================================================================

    fn project(
        &mut self,
        name: Option<Cow<'static, str>>,
        value: Node,
        items: &mut Vec<SelectItem>,
    ) -> Result<()> {
        match value {
            Node::Row(row) => {
                let slot = self.resolve_row(row)?;
                let naming = self.dialect.naming;
                for column in row.table.columns {
                    let alias = name
                        .as_ref()
                        .map(|prefix| Cow::Owned(format!("{prefix}{}", column.name(naming))));
                    items.push(SelectItem {
                        expr: Scalar::column(slot, column),
                        alias,
                    });
                }
            }
            Node::New(members) => {
                for member in members {
                    self.project(member.name, member.value, items)?;
                }
            }
            value => {
                let expr = self.scalar(value)?;
                items.push(SelectItem { expr, alias: name });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn slot(&self, slot: Slot, def: &'static crate::schema::TableDef) -> Result<usize> {
        match slot {
            Slot::Bound(i) => match self.graph.table(i) {
                Some(t) if t.def.same_as(def) => Ok(i),
                _ => Err(OrmLiteError::UnknownTable(def.declared.to_owned())),
            },
            Slot::Any => self.graph.slot_of(def, None),
            Slot::Alias(alias) => self.graph.slot_of(def, Some(alias)),
        }
    }

    fn resolve(&self, column: ColumnRef) -> Result<(usize, &'static ColumnDef)> {
        let slot = self.slot(column.slot, column.table)?;
        Ok((slot, column.table.column(column.field)?))
    }

    fn resolve_row(&self, row: RowRef) -> Result<usize> {
        self.slot(row.slot, row.table)
    }

    /// Moves an embedded query's parameters into this query's namespace.
    fn subquery(&mut self, node: Node) -> Result<Box<QueryState>> {
        let Node::Subquery(mut state) = node else {
            return Err(OrmLiteError::UnsupportedExpression(format!(
                "{} used as a subquery",
                node.describe()
            )));
        };
        let renames = self.binder.absorb(state.binder());
        state.rename_params(&renames);
        Ok(state)
    }
}

fn next(args: &mut impl Iterator<Item = Node>, method: Method) -> Result<Node> {
    args.next().ok_or_else(|| {
        OrmLiteError::UnsupportedExpression(format!("{method:?} is missing an argument"))
    })
}

fn is_true(expr: Scalar) -> Condition {
    Condition::Compare {
        left: expr,
        op: CompareOp::Eq,
        right: Scalar::Bool(true),
    }
}

/// Escapes LIKE wildcards so `text` matches literally.
pub fn escape_wildcards(text: &str, dialect: &Dialect) -> String {
    let escape = dialect.like_escape;
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c == escape || c == '%' || c == '_' || (c == '\\' && dialect.escape_backslash) {
            out.push(escape);
        }
        out.push(c);
    }
    out
}
