//! Operator overloads using std::ops traits.
//!
//! `Expr<T>` and `Col<T>` both accept:
//!
//! - `&`, `|`: logical on booleans, bitwise on integers
//! - `!`: logical NOT on booleans
//! - `^`, `<<`, `>>`: bitwise on integers
//! - `+`, `-`, `*`, `/`, `%` and unary `-` on numbers
//!
//! Whether the dialect can render a bitwise operator is checked when the
//! expression is compiled into a query.

use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use crate::types::{Boolean, Compatible, Conjunctive, Integral, Numeric, SqlType};

use super::{BinaryOp, Col, Expr, IntoExpr, Node, UnaryOp};

#[inline]
fn binary<L: IntoExpr, R: IntoExpr, T>(left: L, op: BinaryOp, right: R) -> Expr<T> {
    Expr::from_node(Node::binary(op, left.into_node(), right.into_node()))
}

macro_rules! impl_ops {
    ($target:ident) => {
        // =====================================================================
        // Logical / bitwise AND, OR
        // =====================================================================

        impl<T, Rhs> BitAnd<Rhs> for $target<T>
        where
            T: Conjunctive + Compatible<Rhs::Type>,
            Rhs: IntoExpr,
        {
            type Output = Expr<T>;

            fn bitand(self, rhs: Rhs) -> Self::Output {
                let op = if T::BITWISE { BinaryOp::BitAnd } else { BinaryOp::And };
                binary(self, op, rhs)
            }
        }

        impl<T, Rhs> BitOr<Rhs> for $target<T>
        where
            T: Conjunctive + Compatible<Rhs::Type>,
            Rhs: IntoExpr,
        {
            type Output = Expr<T>;

            fn bitor(self, rhs: Rhs) -> Self::Output {
                let op = if T::BITWISE { BinaryOp::BitOr } else { BinaryOp::Or };
                binary(self, op, rhs)
            }
        }

        impl<T> Not for $target<T>
        where
            T: SqlType<Family = Boolean>,
        {
            type Output = Expr<bool>;

            fn not(self) -> Self::Output {
                Expr::from_node(Node::unary(UnaryOp::Not, self.into_node()))
            }
        }

        // =====================================================================
        // Bitwise only
        // =====================================================================

        impl<T, Rhs> BitXor<Rhs> for $target<T>
        where
            T: Integral,
            Rhs: IntoExpr,
            Rhs::Type: SqlType<Family = Numeric>,
        {
            type Output = Expr<T>;

            fn bitxor(self, rhs: Rhs) -> Self::Output {
                binary(self, BinaryOp::BitXor, rhs)
            }
        }

        impl<T, Rhs> Shl<Rhs> for $target<T>
        where
            T: Integral,
            Rhs: IntoExpr,
            Rhs::Type: SqlType<Family = Numeric>,
        {
            type Output = Expr<T>;

            fn shl(self, rhs: Rhs) -> Self::Output {
                binary(self, BinaryOp::Shl, rhs)
            }
        }

        impl<T, Rhs> Shr<Rhs> for $target<T>
        where
            T: Integral,
            Rhs: IntoExpr,
            Rhs::Type: SqlType<Family = Numeric>,
        {
            type Output = Expr<T>;

            fn shr(self, rhs: Rhs) -> Self::Output {
                binary(self, BinaryOp::Shr, rhs)
            }
        }

        // =====================================================================
        // Arithmetic
        // =====================================================================

        impl_ops!(@arith $target, Add, add, Add);
        impl_ops!(@arith $target, Sub, sub, Sub);
        impl_ops!(@arith $target, Mul, mul, Mul);
        impl_ops!(@arith $target, Div, div, Div);
        impl_ops!(@arith $target, Rem, rem, Rem);

        impl<T> Neg for $target<T>
        where
            T: SqlType<Family = Numeric>,
        {
            type Output = Expr<T>;

            fn neg(self) -> Self::Output {
                Expr::from_node(Node::unary(UnaryOp::Neg, self.into_node()))
            }
        }
    };
    (@arith $target:ident, $trait:ident, $method:ident, $op:ident) => {
        impl<T, Rhs> $trait<Rhs> for $target<T>
        where
            T: SqlType<Family = Numeric>,
            Rhs: IntoExpr,
            Rhs::Type: SqlType<Family = Numeric>,
        {
            type Output = Expr<T>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                binary(self, BinaryOp::$op, rhs)
            }
        }
    };
}

impl_ops!(Expr);
impl_ops!(Col);
