//! Typed expression trees.
//!
//! Closures passed to the query builder return [`Expr`] values. An `Expr<T>`
//! is a thin typed wrapper over an untyped [`Node`], the closed AST that the
//! walker pattern-matches. The `T` parameter only exists to reject
//! ill-typed expressions at compile time.
//!
//! ```ignore
//! // Function style
//! eq(p.age, 40)
//! and(gt(p.age, 18), starts_with(p.name, "A"))
//!
//! // Operator style (via std::ops traits)
//! gt(p.age, 18) & !p.is_deleted
//! (p.flags & 4) | 1
//! ```

use std::borrow::Cow;
use std::marker::PhantomData;

use ormlite_types::{DbType, Value};

use crate::param::ParamRef;
use crate::query::QueryState;
use crate::schema::{ColumnRef, RowRef};
use crate::types::SqlType;

pub mod agg;
pub mod case;
pub mod cmp;
pub mod logical;
pub mod null;
mod ops;
pub mod set;
pub mod string;
pub mod util;

pub use agg::*;
pub use case::*;
pub use cmp::*;
pub use logical::*;
pub use null::*;
pub use set::*;
pub use string::*;
pub use util::*;

// =============================================================================
// AST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub const fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Recognized method calls. The first argument is always the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Contains,
    StartsWith,
    EndsWith,
    /// `LIKE` with a caller-written pattern
    Like,
    Equals,
    /// `(text, start, len?)` with a 0-based start
    Substring,
    Upper,
    Lower,
    Trim,
    LTrim,
    RTrim,
    Length,
    Cast(DbType),
    /// `(expr, List)`
    In,
    /// `(expr, Subquery)`
    InQuery,
    /// `(Subquery)`
    Exists,
    Count,
    CountAll,
    CountDistinct,
    Sum,
    Min,
    Max,
    Avg,
    Coalesce,
}

/// One entry of an anonymous composite (`New`).
#[derive(Debug, Clone)]
pub struct Member {
    pub name: Option<Cow<'static, str>>,
    pub value: Node,
}

/// Untyped expression node.
#[derive(Debug, Clone)]
pub enum Node {
    Constant(Value),
    /// Captured collection
    List(Vec<Value>),
    /// Parameter bound by the caller on the query
    Param(ParamRef),
    Column(ColumnRef),
    /// Every column of one table registration
    Row(RowRef),
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call {
        method: Method,
        args: Vec<Node>,
    },
    New(Vec<Member>),
    Member {
        object: Box<Node>,
        name: Cow<'static, str>,
    },
    Conditional {
        test: Box<Node>,
        then: Box<Node>,
        otherwise: Box<Node>,
    },
    /// Caller-written SQL, copied verbatim
    Raw(String),
    Subquery(Box<QueryState>),
}

impl Node {
    #[inline]
    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[inline]
    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[inline]
    pub fn call(method: Method, args: Vec<Node>) -> Self {
        Node::Call { method, args }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Node::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Node::Constant(v) => format!("constant {v}"),
            Node::List(values) => format!("list of {} values", values.len()),
            Node::Param(param) => format!("parameter #{}", param.id().index()),
            Node::Column(c) => format!("column {}.{}", c.table.declared, c.field),
            Node::Row(r) => format!("row of {}", r.table.declared),
            Node::Unary { op, .. } => format!("{op:?} expression"),
            Node::Binary { op, .. } => format!("{op:?} expression"),
            Node::Call { method, .. } => format!("call to {method:?}"),
            Node::New(members) => format!("composite of {} members", members.len()),
            Node::Member { name, .. } => format!("member access `{name}`"),
            Node::Conditional { .. } => "conditional".to_owned(),
            Node::Raw(sql) => format!("raw `{sql}`"),
            Node::Subquery(_) => "subquery".to_owned(),
        }
    }
}

// =============================================================================
// Typed wrappers
// =============================================================================

/// A typed expression.
pub struct Expr<T> {
    node: Node,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    #[inline]
    pub fn from_node(node: Node) -> Self {
        Self {
            node,
            _ty: PhantomData,
        }
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[inline]
    pub fn into_node(self) -> Node {
        self.node
    }

    /// Projects this expression under an output name.
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> Aliased {
        Aliased {
            name: name.into(),
            node: self.node,
        }
    }
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> core::fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Expr").field(&self.node).finish()
    }
}

/// A typed column handle.
pub struct Col<T> {
    column: ColumnRef,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Col<T> {
    #[inline]
    pub const fn new(column: ColumnRef) -> Self {
        Self {
            column,
            _ty: PhantomData,
        }
    }

    #[inline]
    pub const fn column_ref(&self) -> ColumnRef {
        self.column
    }

    #[inline]
    pub fn expr(self) -> Expr<T> {
        Expr::from_node(Node::Column(self.column))
    }

    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> Aliased {
        self.expr().alias(name)
    }
}

impl<T> Clone for Col<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Col<T> {}

impl<T> core::fmt::Debug for Col<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Col({}.{})", self.column.table.declared, self.column.field)
    }
}

/// An expression projected under an explicit output name.
#[derive(Debug, Clone)]
pub struct Aliased {
    name: Cow<'static, str>,
    node: Node,
}

// =============================================================================
// Conversion traits
// =============================================================================

/// Anything usable as an operand: expressions, columns and plain values.
pub trait IntoExpr {
    type Type: SqlType;

    fn into_node(self) -> Node;
}

impl<T: SqlType> IntoExpr for Expr<T> {
    type Type = T;

    #[inline]
    fn into_node(self) -> Node {
        self.node
    }
}

impl<T: SqlType> IntoExpr for Col<T> {
    type Type = T;

    #[inline]
    fn into_node(self) -> Node {
        Node::Column(self.column)
    }
}

macro_rules! impl_into_expr_value {
    ($($t:ty => $sql:ty),* $(,)?) => {
        $(
            impl IntoExpr for $t {
                type Type = $sql;

                #[inline]
                fn into_node(self) -> Node {
                    Node::Constant(Value::from(self))
                }
            }
        )*
    };
}

impl_into_expr_value!(
    i8 => i8,
    i16 => i16,
    i32 => i32,
    i64 => i64,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    f32 => f32,
    f64 => f64,
    bool => bool,
    char => char,
    String => String,
    &str => String,
    &String => String,
    Vec<u8> => Vec<u8>,
);

#[cfg(feature = "chrono")]
impl_into_expr_value!(
    chrono::NaiveDate => chrono::NaiveDate,
    chrono::NaiveDateTime => chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc> => chrono::DateTime<chrono::Utc>,
);

#[cfg(feature = "uuid")]
impl_into_expr_value!(uuid::Uuid => uuid::Uuid);

impl<T> IntoExpr for Option<T>
where
    T: SqlType + Into<Value>,
{
    type Type = Option<T>;

    #[inline]
    fn into_node(self) -> Node {
        Node::Constant(self.map_or(Value::Null, Into::into))
    }
}

/// Anything usable as a SELECT list, GROUP BY key or ORDER BY key.
///
/// Implemented for expressions, columns, aliased expressions and tuples of
/// up to twelve of them.
pub trait IntoProjection {
    fn push_members(self, out: &mut Vec<Member>);

    fn into_members(self) -> Vec<Member>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        self.push_members(&mut out);
        out
    }
}

impl<T> IntoProjection for Expr<T> {
    fn push_members(self, out: &mut Vec<Member>) {
        match self.node {
            // a record spreads into its members
            Node::New(members) => out.extend(members),
            node => out.push(Member {
                name: None,
                value: node,
            }),
        }
    }
}

impl<T> IntoProjection for Col<T> {
    fn push_members(self, out: &mut Vec<Member>) {
        out.push(Member {
            name: None,
            value: Node::Column(self.column),
        });
    }
}

impl IntoProjection for Aliased {
    fn push_members(self, out: &mut Vec<Member>) {
        out.push(Member {
            name: Some(self.name),
            value: self.node,
        });
    }
}

impl IntoProjection for Vec<Member> {
    fn push_members(self, out: &mut Vec<Member>) {
        out.extend(self);
    }
}

macro_rules! impl_projection_tuple {
    ($($name:ident),+) => {
        impl<$($name: IntoProjection),+> IntoProjection for ($($name,)+) {
            #[allow(non_snake_case)]
            fn push_members(self, out: &mut Vec<Member>) {
                let ($($name,)+) = self;
                $($name.push_members(out);)+
            }
        }
    };
}

impl_projection_tuple!(A);
impl_projection_tuple!(A, B);
impl_projection_tuple!(A, B, C);
impl_projection_tuple!(A, B, C, D);
impl_projection_tuple!(A, B, C, D, E);
impl_projection_tuple!(A, B, C, D, E, F);
impl_projection_tuple!(A, B, C, D, E, F, G);
impl_projection_tuple!(A, B, C, D, E, F, G, H);
impl_projection_tuple!(A, B, C, D, E, F, G, H, I);
impl_projection_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_projection_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_projection_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
