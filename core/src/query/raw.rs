//! Caller-written SQL with `{n}` arguments.
//!
//! `{0}`, `{1}`, .. refer to the supplied arguments by position. A value
//! argument becomes one parameter; a list argument becomes a comma-separated
//! run of parameters, or `NULL` when empty. An argument referenced twice is
//! bound once. Braces not enclosing a plain index are copied verbatim.

use ormlite_types::Value;

use crate::condition::{RawPart, RawSql};
use crate::error::{OrmLiteError, Result};
use crate::param::{ParamBinder, ParamId, ParamRef};

/// One argument of a raw fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArg {
    Value(Value),
    List(Vec<Value>),
    /// A parameter already registered on the query
    Param(ParamRef),
}

impl RawArg {
    pub fn value(value: impl Into<Value>) -> Self {
        RawArg::Value(value.into())
    }

    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        RawArg::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<ParamRef> for RawArg {
    fn from(param: ParamRef) -> Self {
        RawArg::Param(param)
    }
}

impl From<Value> for RawArg {
    fn from(value: Value) -> Self {
        RawArg::Value(value)
    }
}

enum Bound {
    One(ParamId),
    Many(Vec<ParamId>),
}

/// Binds `args` into `binder` and splits `sql` around its placeholders.
pub(crate) fn compile(
    sql: &str,
    args: Vec<RawArg>,
    binder: &mut ParamBinder,
) -> Result<RawSql> {
    let supplied = args.len();
    let mut bound: Vec<Option<Bound>> = Vec::new();
    bound.resize_with(supplied, || None);
    let mut args: Vec<Option<RawArg>> = args.into_iter().map(Some).collect();

    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = sql;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok().map(|i| (i, digits.len())));

        let Some((index, width)) = index else {
            text.push_str(&rest[..=open]);
            rest = after;
            continue;
        };

        text.push_str(&rest[..open]);
        rest = &after[width + 1..];

        if index >= supplied {
            return Err(OrmLiteError::InvalidRawSql { index, supplied });
        }
        if bound[index].is_none() {
            bound[index] = match args[index].take() {
                Some(RawArg::Value(v)) => Some(Bound::One(binder.bind(v))),
                Some(RawArg::Param(p)) => Some(Bound::One(binder.resolve(p)?)),
                Some(RawArg::List(values)) => {
                    Some(Bound::Many(values.into_iter().map(|v| binder.bind(v)).collect()))
                }
                None => None,
            };
        }

        if !text.is_empty() {
            parts.push(RawPart::Text(std::mem::take(&mut text)));
        }
        parts.push(match &bound[index] {
            Some(Bound::One(id)) => RawPart::Param(*id),
            Some(Bound::Many(ids)) if ids.is_empty() => RawPart::Null,
            Some(Bound::Many(ids)) => RawPart::List(ids.clone()),
            None => RawPart::Null,
        });
    }

    text.push_str(rest);
    if !text.is_empty() {
        parts.push(RawPart::Text(text));
    }
    Ok(RawSql { parts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_around_arguments() {
        let mut binder = ParamBinder::default();
        let raw = compile(
            "Age > {0} AND Name IN ({1})",
            vec![RawArg::value(40), RawArg::list(["a", "b"])],
            &mut binder,
        )
        .unwrap();
        assert_eq!(raw.parts.len(), 5);
        assert!(matches!(&raw.parts[0], RawPart::Text(t) if t == "Age > "));
        assert!(matches!(&raw.parts[3], RawPart::List(ids) if ids.len() == 2));
        assert_eq!(binder.len(), 3);
    }

    #[test]
    fn repeated_argument_binds_once() {
        let mut binder = ParamBinder::default();
        let raw = compile("{0} = {0}", vec![RawArg::value(1)], &mut binder).unwrap();
        assert_eq!(binder.len(), 1);
        assert_eq!(raw.parts[0], raw.parts[2]);
    }

    #[test]
    fn param_from_another_binder_is_rejected() {
        let mut owner = ParamBinder::default();
        let theirs = owner.param_ref(Value::Integer(7));

        let mut binder = ParamBinder::default();
        binder.bind(Value::Integer(1));
        let err = compile("x = {0}", vec![theirs.into()], &mut binder).unwrap_err();
        assert_eq!(err, OrmLiteError::ForeignParam(0));

        let raw = compile("x = {0}", vec![theirs.into()], &mut owner).unwrap();
        assert_eq!(raw.parts[1], RawPart::Param(theirs.id()));
        assert_eq!(owner.len(), 1);
    }

    #[test]
    fn empty_list_becomes_null() {
        let mut binder = ParamBinder::default();
        let raw = compile("x IN ({0})", vec![RawArg::list(Vec::<i64>::new())], &mut binder)
            .unwrap();
        assert!(matches!(raw.parts[1], RawPart::Null));
        assert!(binder.is_empty());
    }

    #[test]
    fn non_index_braces_are_text() {
        let mut binder = ParamBinder::default();
        let raw = compile("json ->> '{a}' = {0}", vec![RawArg::value("v")], &mut binder).unwrap();
        assert!(matches!(&raw.parts[0], RawPart::Text(t) if t == "json ->> '{a}' = "));
    }

    #[test]
    fn missing_argument_is_an_error() {
        let mut binder = ParamBinder::default();
        assert_eq!(
            compile("{2}", vec![RawArg::value(1)], &mut binder).unwrap_err(),
            OrmLiteError::InvalidRawSql {
                index: 2,
                supplied: 1
            }
        );
    }
}
