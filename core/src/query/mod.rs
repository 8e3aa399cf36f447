//! Query state and the fluent builder.
//!
//! A [`Query<T>`] wraps a [`QueryState`]: the join graph, the compiled
//! clauses and the parameter binder. Every builder call compiles its closure
//! immediately, so resolution errors surface where the call is made and the
//! state only ever holds resolved [`Condition`]s and [`Scalar`]s.
//!
//! Clause updates come in two kinds, never mixed: a reset replaces the held
//! clause and a combine extends it. See [`Update`] and [`OrderUpdate`].

mod builder;
mod fields;
mod raw;

use std::borrow::Cow;

use hashbrown::HashMap;
use ormlite_types::Dialect;

pub use builder::Query;
pub use raw::RawArg;

use crate::condition::{Condition, Logical, RawSql, Scalar};
use crate::config::Config;
use crate::join::{JoinGraph, JoinOn, TableRef};
use crate::param::ParamBinder;
use crate::walker::Walker;

// =============================================================================
// Clause parts
// =============================================================================

/// One entry of the SELECT list.
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub expr: Scalar,
    pub alias: Option<Cow<'static, str>>,
}

/// One ORDER BY key.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub expr: Scalar,
    pub descending: bool,
}

impl OrderItem {
    pub fn new(expr: Scalar, descending: bool) -> Self {
        Self { expr, descending }
    }
}

/// The SELECT list.
#[derive(Debug, Clone, Default)]
pub enum Projection {
    /// Every column of every registered table
    #[default]
    All,
    Items(Vec<SelectItem>),
    Raw(RawSql),
}

/// How a new condition lands on a held one.
#[derive(Debug, Clone)]
pub enum Update {
    /// Replace the held condition; `None` clears it
    Reset(Option<Condition>),
    /// `(held) <op> (new)`, or just `new` when nothing is held
    Combine(Logical, Condition),
}

impl Update {
    pub fn apply(self, held: &mut Option<Condition>) {
        *held = match self {
            Update::Reset(cond) => cond,
            Update::Combine(op, cond) => Some(match held.take() {
                Some(existing) => existing.combine(op, cond),
                None => cond,
            }),
        };
    }
}

/// How new keys land on the held ORDER BY list.
#[derive(Debug, Clone)]
pub enum OrderUpdate {
    Reset(Vec<OrderItem>),
    Append(Vec<OrderItem>),
}

impl OrderUpdate {
    pub fn apply(self, held: &mut Vec<OrderItem>) {
        match self {
            OrderUpdate::Reset(items) => *held = items,
            OrderUpdate::Append(items) => held.extend(items),
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Everything a query knows. Cloning is a deep copy.
#[derive(Debug, Clone)]
pub struct QueryState {
    pub(crate) dialect: Dialect,
    pub(crate) config: Config,
    pub(crate) graph: JoinGraph,
    pub(crate) binder: ParamBinder,
    pub(crate) filter: Option<Condition>,
    /// Survives `where` resets
    pub(crate) ensure: Option<Condition>,
    pub(crate) having: Option<Condition>,
    pub(crate) projection: Projection,
    pub(crate) distinct: bool,
    pub(crate) group_by: Vec<Scalar>,
    pub(crate) order: Vec<OrderItem>,
    pub(crate) offset: Option<u64>,
    pub(crate) rows: Option<u64>,
    pub(crate) tags: Vec<String>,
}

impl QueryState {
    pub fn new(dialect: Dialect, config: Config, root: TableRef) -> Self {
        Self {
            dialect,
            config,
            graph: JoinGraph::new(root),
            binder: ParamBinder::new(config.enum_encoding),
            filter: None,
            ensure: None,
            having: None,
            projection: Projection::All,
            distinct: false,
            group_by: Vec::new(),
            order: Vec::new(),
            offset: None,
            rows: None,
            tags: Vec::new(),
        }
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &JoinGraph {
        &self.graph
    }

    #[inline]
    pub fn binder(&self) -> &ParamBinder {
        &self.binder
    }

    #[inline]
    pub fn filter(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn group_by(&self) -> &[Scalar] {
        &self.group_by
    }

    #[inline]
    pub fn order(&self) -> &[OrderItem] {
        &self.order
    }

    /// `(offset, rows)`
    #[inline]
    pub fn paging(&self) -> (Option<u64>, Option<u64>) {
        (self.offset, self.rows)
    }

    /// A walker compiling against this state's graph and binder.
    pub(crate) fn walker(&mut self) -> Walker<'_> {
        Walker::new(&self.graph, &mut self.binder, &self.dialect, &self.config)
    }

    /// Applies an absorb rename map to this state and every query nested in it.
    ///
    /// Nested queries were absorbed into this one earlier, so their names are
    /// a subset of this binder's and the same map applies to them.
    pub fn rename_params(&mut self, renames: &HashMap<String, String>) {
        self.binder.rename(renames);

        let mut visit = |q: &mut QueryState| q.rename_params(renames);
        for cond in [&mut self.filter, &mut self.ensure, &mut self.having]
            .into_iter()
            .flatten()
        {
            cond.for_each_query_mut(&mut visit);
        }
        if let Projection::Items(items) = &mut self.projection {
            for item in items {
                item.expr.for_each_query_mut(&mut visit);
            }
        }
        for key in &mut self.group_by {
            key.for_each_query_mut(&mut visit);
        }
        for item in &mut self.order {
            item.expr.for_each_query_mut(&mut visit);
        }
        for edge in self.graph.edges_mut() {
            if let JoinOn::Condition(cond) = &mut edge.on {
                cond.for_each_query_mut(&mut visit);
            }
        }
    }
}

// =============================================================================
// Subqueries
// =============================================================================

/// Anything that can be embedded as a subquery.
///
/// Implemented for [`Query`] by value and by reference; a reference is
/// cloned, leaving the original usable.
pub trait IntoSubquery {
    fn into_state(self) -> QueryState;
}

impl IntoSubquery for QueryState {
    #[inline]
    fn into_state(self) -> QueryState {
        self
    }
}
