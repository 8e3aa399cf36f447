//! Constant folding.
//!
//! Any sub-expression that can be evaluated without a database is reduced to
//! a [`Node::Constant`] before the walker sees it. Column references, raw SQL,
//! parameters and subqueries are never folded.

use std::cmp::Ordering;

use ormlite_types::Value;

use crate::expr::{BinaryOp, Member, Method, Node, UnaryOp};

/// Folds constant sub-expressions bottom-up. Never fails; whatever cannot be
/// evaluated is returned unchanged.
pub fn fold(node: Node) -> Node {
    match node {
        Node::Unary { op, operand } => fold_unary(op, fold(*operand)),
        Node::Binary { op, left, right } => fold_binary(op, fold(*left), fold(*right)),
        Node::Call { method, args } => fold_call(method, args.into_iter().map(fold).collect()),
        Node::New(members) => Node::New(
            members
                .into_iter()
                .map(|m| Member {
                    name: m.name,
                    value: fold(m.value),
                })
                .collect(),
        ),
        Node::Member { object, name } => match fold(*object) {
            Node::New(members) => match members
                .iter()
                .position(|m| m.name.as_deref() == Some(&*name))
            {
                Some(i) => members.into_iter().nth(i).map_or(Node::Constant(Value::Null), |m| m.value),
                None => Node::Member {
                    object: Box::new(Node::New(members)),
                    name,
                },
            },
            object => Node::Member {
                object: Box::new(object),
                name,
            },
        },
        Node::Conditional {
            test,
            then,
            otherwise,
        } => match fold(*test) {
            Node::Constant(Value::Bool(true)) => fold(*then),
            Node::Constant(Value::Bool(false)) => fold(*otherwise),
            test => Node::Conditional {
                test: Box::new(test),
                then: Box::new(fold(*then)),
                otherwise: Box::new(fold(*otherwise)),
            },
        },
        other => other,
    }
}

fn fold_unary(op: UnaryOp, operand: Node) -> Node {
    match (op, &operand) {
        (UnaryOp::Not, Node::Constant(Value::Bool(b))) => Node::Constant(Value::Bool(!b)),
        (UnaryOp::Neg, Node::Constant(Value::Integer(i))) if *i != i64::MIN => {
            Node::Constant(Value::Integer(-i))
        }
        (UnaryOp::Neg, Node::Constant(Value::Real(r))) => Node::Constant(Value::Real(-r)),
        _ => Node::unary(op, operand),
    }
}

fn fold_binary(op: BinaryOp, left: Node, right: Node) -> Node {
    // short-circuit with one constant side
    match (op, left.as_constant(), right.as_constant()) {
        (BinaryOp::And, Some(Value::Bool(false)), _) | (BinaryOp::And, _, Some(Value::Bool(false))) => {
            return Node::Constant(Value::Bool(false));
        }
        (BinaryOp::Or, Some(Value::Bool(true)), _) | (BinaryOp::Or, _, Some(Value::Bool(true))) => {
            return Node::Constant(Value::Bool(true));
        }
        (BinaryOp::And, Some(Value::Bool(true)), _) | (BinaryOp::Or, Some(Value::Bool(false)), _) => {
            return right;
        }
        (BinaryOp::And, _, Some(Value::Bool(true))) | (BinaryOp::Or, _, Some(Value::Bool(false))) => {
            return left;
        }
        _ => {}
    }

    if let (Some(l), Some(r)) = (left.as_constant(), right.as_constant())
        && let Some(value) = eval_binary(op, l, r)
    {
        return Node::Constant(value);
    }
    Node::binary(op, left, right)
}

fn eval_binary(op: BinaryOp, l: &Value, r: &Value) -> Option<Value> {
    if l.is_null() || r.is_null() {
        return None;
    }
    let value = match op {
        BinaryOp::Eq => Value::Bool(compare(l, r)? == Ordering::Equal),
        BinaryOp::Ne => Value::Bool(compare(l, r)? != Ordering::Equal),
        BinaryOp::Lt => Value::Bool(compare(l, r)? == Ordering::Less),
        BinaryOp::Le => Value::Bool(compare(l, r)? != Ordering::Greater),
        BinaryOp::Gt => Value::Bool(compare(l, r)? == Ordering::Greater),
        BinaryOp::Ge => Value::Bool(compare(l, r)? != Ordering::Less),
        BinaryOp::And => Value::Bool(l.as_bool()? && r.as_bool()?),
        BinaryOp::Or => Value::Bool(l.as_bool()? || r.as_bool()?),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, l, r)?
        }
        BinaryOp::BitAnd => Value::Integer(int(l)? & int(r)?),
        BinaryOp::BitOr => Value::Integer(int(l)? | int(r)?),
        BinaryOp::BitXor => Value::Integer(int(l)? ^ int(r)?),
        BinaryOp::Shl => Value::Integer(int(l)?.checked_shl(u32::try_from(int(r)?).ok()?)?),
        BinaryOp::Shr => Value::Integer(int(l)?.checked_shr(u32::try_from(int(r)?).ok()?)?),
    };
    Some(value)
}

fn int(v: &Value) -> Option<i64> {
    match v {
        Value::Integer(i) => Some(*i),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, l: &Value, r: &Value) -> Option<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (l, r) {
        let (a, b) = (*a, *b);
        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div => a.checked_div(b),
            BinaryOp::Rem => a.checked_rem(b),
            _ => None,
        };
        return result.map(Value::Integer);
    }
    let (a, b) = (l.as_f64()?, r.as_f64()?);
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div if b != 0.0 => a / b,
        BinaryOp::Rem if b != 0.0 => a % b,
        _ => return None,
    };
    Some(Value::Real(result))
}

/// Orders two non-null constants of compatible kinds.
fn compare(l: &Value, r: &Value) -> Option<Ordering> {
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
        (Value::Enum { ordinal: a, .. }, Value::Enum { ordinal: b, .. }) => Some(a.cmp(b)),
        _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
    }
}

fn fold_call(method: Method, args: Vec<Node>) -> Node {
    match eval_call(method, &args) {
        Some(value) => Node::Constant(value),
        None => Node::call(method, args),
    }
}

fn eval_call(method: Method, args: &[Node]) -> Option<Value> {
    let text = |i: usize| match args.get(i)?.as_constant()? {
        Value::Text(s) => Some(s.as_str()),
        _ => None,
    };

    let value = match method {
        Method::Upper => Value::Text(text(0)?.to_uppercase()),
        Method::Lower => Value::Text(text(0)?.to_lowercase()),
        Method::Trim => Value::Text(text(0)?.trim().to_owned()),
        Method::LTrim => Value::Text(text(0)?.trim_start().to_owned()),
        Method::RTrim => Value::Text(text(0)?.trim_end().to_owned()),
        Method::Length => Value::Integer(i64::try_from(text(0)?.chars().count()).ok()?),
        Method::Contains => Value::Bool(text(0)?.contains(text(1)?)),
        Method::StartsWith => Value::Bool(text(0)?.starts_with(text(1)?)),
        Method::EndsWith => Value::Bool(text(0)?.ends_with(text(1)?)),
        Method::Equals => Value::Bool(text(0)? == text(1)?),
        Method::Substring => {
            let s = text(0)?;
            let start = usize::try_from(int(args.get(1)?.as_constant()?)?).ok()?;
            let chars = s.chars().skip(start);
            let out: String = match args.get(2) {
                Some(len) => {
                    let len = usize::try_from(int(len.as_constant()?)?).ok()?;
                    chars.take(len).collect()
                }
                None => chars.collect(),
            };
            Value::Text(out)
        }
        Method::Coalesce => match args.first()?.as_constant()? {
            Value::Null => args.get(1)?.as_constant()?.clone(),
            v => v.clone(),
        },
        Method::In => {
            let needle = args.first()?.as_constant()?;
            let Node::List(values) = args.get(1)? else {
                return None;
            };
            if needle.is_null() {
                return None;
            }
            Value::Bool(
                values
                    .iter()
                    .any(|v| compare(needle, v) == Some(Ordering::Equal)),
            )
        }
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(v: impl Into<Value>) -> Node {
        Node::Constant(v.into())
    }

    #[test]
    fn folds_arithmetic_and_comparison() {
        let sum = Node::binary(BinaryOp::Add, c(2), c(3));
        let cmp = Node::binary(BinaryOp::Gt, sum, c(4));
        assert!(matches!(fold(cmp), Node::Constant(Value::Bool(true))));
    }

    #[test]
    fn keeps_division_by_zero() {
        let div = Node::binary(BinaryOp::Div, c(1), c(0));
        assert!(matches!(fold(div), Node::Binary { .. }));
    }

    #[test]
    fn short_circuits_logical_ops() {
        let raw = Node::Raw("x = 1".into());
        let and = Node::binary(BinaryOp::And, c(true), raw.clone());
        assert!(matches!(fold(and), Node::Raw(_)));
        let or = Node::binary(BinaryOp::Or, raw, c(true));
        assert!(matches!(fold(or), Node::Constant(Value::Bool(true))));
    }

    #[test]
    fn member_access_on_record() {
        let record = Node::New(vec![Member {
            name: Some("Limit".into()),
            value: Node::binary(BinaryOp::Mul, c(6), c(7)),
        }]);
        let access = Node::Member {
            object: Box::new(record),
            name: "Limit".into(),
        };
        assert!(matches!(fold(access), Node::Constant(Value::Integer(42))));
    }

    #[test]
    fn conditional_picks_branch() {
        let node = Node::Conditional {
            test: Box::new(Node::binary(BinaryOp::Eq, c("a"), c("a"))),
            then: Box::new(c(1)),
            otherwise: Box::new(c(2)),
        };
        assert!(matches!(fold(node), Node::Constant(Value::Integer(1))));
    }

    #[test]
    fn string_methods() {
        let upper = Node::call(Method::Upper, vec![c("abc")]);
        assert!(matches!(fold(upper), Node::Constant(Value::Text(ref s)) if s == "ABC"));
        let sub = Node::call(Method::Substring, vec![c("hello"), c(1), c(3)]);
        assert!(matches!(fold(sub), Node::Constant(Value::Text(ref s)) if s == "ell"));
    }

    #[test]
    fn membership_of_constant() {
        let node = Node::call(
            Method::In,
            vec![c(2), Node::List(vec![Value::Integer(1), Value::Integer(2)])],
        );
        assert!(matches!(fold(node), Node::Constant(Value::Bool(true))));
    }
}
