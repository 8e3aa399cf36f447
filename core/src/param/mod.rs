//! Parameter binding.
//!
//! Every literal that survives constant folding is bound here. Names are
//! assigned when an expression is compiled into the query, not when SQL is
//! rendered, so rendering the same query as a SELECT and as a COUNT yields
//! the same names for the shared filter.

use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::{HashMap, HashSet};
use ormlite_types::Value;

use crate::config::EnumEncoding;
use crate::error::{OrmLiteError, Result};

/// Index of a parameter inside the binder that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(usize);

impl ParamId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// A bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Placeholder name without the dialect prefix
    pub name: String,
    pub value: Value,
}

/// Handle to a caller-supplied parameter, usable in expressions through
/// [`param`](crate::expr::param) and as a raw SQL argument.
///
/// Valid only in the query that registered it and in clones of that query.
/// Anywhere else compiling it fails with [`OrmLiteError::ForeignParam`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamRef {
    id: ParamId,
    owner: u64,
}

impl ParamRef {
    #[inline]
    pub const fn id(&self) -> ParamId {
        self.id
    }
}

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Allocates parameter names and stores bound values.
#[derive(Debug, Clone)]
pub struct ParamBinder {
    params: Vec<Param>,
    names: HashSet<String>,
    next: usize,
    encoding: EnumEncoding,
    /// Stamped into every [`ParamRef`] handed out; shared by clones
    owner: u64,
}

impl Default for ParamBinder {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            names: HashSet::new(),
            next: 0,
            encoding: EnumEncoding::default(),
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl ParamBinder {
    pub fn new(encoding: EnumEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    /// Binds `value` under the next free sequential name.
    pub fn bind(&mut self, value: Value) -> ParamId {
        let name = self.next_free_name();
        self.push(name, value)
    }

    /// Binds `value` under a caller-chosen name.
    pub fn bind_named(&mut self, name: &str, value: Value) -> Result<ParamId> {
        if self.names.contains(name) {
            return Err(OrmLiteError::DuplicateParam(name.to_owned()));
        }
        Ok(self.push(name.to_owned(), value))
    }

    pub fn param_ref(&mut self, value: Value) -> ParamRef {
        ParamRef {
            id: self.bind(value),
            owner: self.owner,
        }
    }

    pub fn named_param_ref(&mut self, name: &str, value: Value) -> Result<ParamRef> {
        Ok(ParamRef {
            id: self.bind_named(name, value)?,
            owner: self.owner,
        })
    }

    /// The id behind `param`, provided this binder (or the one it was cloned
    /// from) handed it out.
    pub fn resolve(&self, param: ParamRef) -> Result<ParamId> {
        if param.owner == self.owner && param.id.0 < self.params.len() {
            Ok(param.id)
        } else {
            Err(OrmLiteError::ForeignParam(param.id.0))
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> Option<&Param> {
        self.params.get(id.0)
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Reserves fresh names for every parameter of `sub` and copies them in.
    ///
    /// Returns the old-to-new name map that the embedded query must apply to
    /// itself (see [`QueryState::rename_params`](crate::query::QueryState::rename_params)).
    pub fn absorb(&mut self, sub: &ParamBinder) -> HashMap<String, String> {
        let mut renames = HashMap::with_capacity(sub.params.len());
        for param in &sub.params {
            let name = self.next_free_name();
            renames.insert(param.name.clone(), name.clone());
            self.push(name, param.value.clone());
        }
        renames
    }

    /// Applies a rename map produced by [`absorb`](Self::absorb).
    pub fn rename(&mut self, renames: &HashMap<String, String>) {
        for param in &mut self.params {
            if let Some(new) = renames.get(&param.name) {
                param.name.clone_from(new);
            }
        }
        self.names = self.params.iter().map(|p| p.name.clone()).collect();
    }

    fn push(&mut self, name: String, value: Value) -> ParamId {
        let value = match (value, self.encoding) {
            (Value::Enum { name, .. }, EnumEncoding::Name) => Value::Text(name.to_owned()),
            (Value::Enum { ordinal, .. }, EnumEncoding::Integer) => Value::Integer(ordinal),
            (value, _) => value,
        };
        self.names.insert(name.clone());
        self.params.push(Param { name, value });
        ParamId(self.params.len() - 1)
    }

    fn next_free_name(&mut self) -> String {
        loop {
            let name = self.next.to_string();
            self.next += 1;
            if !self.names.contains(&name) {
                return name;
            }
        }
    }
}
