//! `Query<T>`: the fluent, typed face of a [`QueryState`].

use std::borrow::Cow;
use std::marker::PhantomData;

use ormlite_types::{Dialect, Value};

use crate::condition::{Condition, Logical, RawSql, Scalar};
use crate::config::Config;
use crate::error::Result;
use crate::expr::{Col, IntoExpr, IntoProjection, Node, exists};
use crate::join::{Join, JoinEdge, JoinKind, JoinOn, TableRef};
use crate::param::{Param, ParamRef};
use crate::render::{Renderer, Statement};
use crate::schema::{Slot, Source, Table};
use crate::types::{Boolean, SqlType};

use super::raw::{self, RawArg};
use super::{fields, IntoSubquery, OrderItem, OrderUpdate, Projection, QueryState, Update};

// =============================================================================
// Predicates
// =============================================================================

/// A boolean expression usable as a filter or join condition.
///
/// Implemented for every [`IntoExpr`] whose SQL type is boolean, so a bare
/// `Col<bool>` is a predicate as well as a comparison.
pub trait IntoPredicate {
    fn into_predicate(self) -> Node;
}

impl<E> IntoPredicate for E
where
    E: IntoExpr,
    E::Type: SqlType<Family = Boolean>,
{
    #[inline]
    fn into_predicate(self) -> Node {
        self.into_node()
    }
}

// =============================================================================
// Query
// =============================================================================

/// A query rooted at table `T`.
///
/// Closures receive column handles: `T`'s for the plain methods, and the
/// handles of any registered table (or tuple of tables) for the `_on`
/// variants.
///
/// ```ignore
/// let q = db
///     .from::<Person>()
///     .r#where(|p| gt(p.age, 40))?
///     .and(|p| starts_with(p.first_name, "A"))?
///     .order_by(|p| p.last_name)?
///     .limit(0, 10);
/// let stmt = q.to_select_statement();
/// ```
pub struct Query<T> {
    state: QueryState,
    _table: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            _table: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Query").field("state", &self.state).finish()
    }
}

impl<T> IntoSubquery for Query<T> {
    #[inline]
    fn into_state(self) -> QueryState {
        self.state
    }
}

impl<T> IntoSubquery for &Query<T> {
    #[inline]
    fn into_state(self) -> QueryState {
        self.state.clone()
    }
}

impl<T: Table> Query<T> {
    pub fn new(dialect: Dialect, config: Config) -> Self {
        Self::from_root(dialect, config, None)
    }

    /// A query whose root table is registered under `alias`.
    pub fn with_alias(
        dialect: Dialect,
        config: Config,
        alias: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::from_root(dialect, config, Some(alias.into()))
    }

    fn from_root(dialect: Dialect, config: Config, alias: Option<Cow<'static, str>>) -> Self {
        Self {
            state: QueryState::new(dialect, config, TableRef::new(T::def(), alias)),
            _table: PhantomData,
        }
    }

    /// Root column handles, bound to the root slot even when `T` is joined
    /// again under an alias.
    #[inline]
    fn root(&self) -> T::Columns {
        T::columns(Slot::Bound(0))
    }

    fn predicate(&mut self, node: Node) -> Result<Condition> {
        self.state.walker().predicate(node)
    }

    fn raw(&mut self, sql: &str, args: impl IntoIterator<Item = RawArg>) -> Result<RawSql> {
        raw::compile(sql, args.into_iter().collect(), &mut self.state.binder)
    }

    // =========================================================================
    // WHERE
    // =========================================================================

    /// Replaces the filter.
    pub fn r#where<P: IntoPredicate>(mut self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let cond = self.predicate(f(self.root()).into_predicate())?;
        Update::Reset(Some(cond)).apply(&mut self.state.filter);
        Ok(self)
    }

    /// Replaces the filter with one over any registered tables.
    pub fn where_on<S: Source, P: IntoPredicate>(
        mut self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let cols = S::resolve(&self.state.graph)?;
        let cond = self.predicate(f(cols).into_predicate())?;
        Update::Reset(Some(cond)).apply(&mut self.state.filter);
        Ok(self)
    }

    /// `(filter) AND (new)`
    pub fn and<P: IntoPredicate>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let node = f(self.root()).into_predicate();
        self.combine(Logical::And, node)
    }

    pub fn and_on<S: Source, P: IntoPredicate>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let node = f(S::resolve(&self.state.graph)?).into_predicate();
        self.combine(Logical::And, node)
    }

    /// `(filter) OR (new)`
    pub fn or<P: IntoPredicate>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let node = f(self.root()).into_predicate();
        self.combine(Logical::Or, node)
    }

    pub fn or_on<S: Source, P: IntoPredicate>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let node = f(S::resolve(&self.state.graph)?).into_predicate();
        self.combine(Logical::Or, node)
    }

    fn combine(mut self, op: Logical, node: Node) -> Result<Self> {
        let cond = self.predicate(node)?;
        Update::Combine(op, cond).apply(&mut self.state.filter);
        Ok(self)
    }

    /// Removes the filter. Conditions added with [`ensure`](Self::ensure) stay.
    pub fn clear_where(mut self) -> Self {
        Update::Reset(None).apply(&mut self.state.filter);
        self
    }

    /// Replaces the filter with caller-written SQL.
    ///
    /// `{0}`, `{1}`, .. are bound from `args`; see [`RawArg`].
    pub fn where_raw(
        mut self,
        sql: &str,
        args: impl IntoIterator<Item = RawArg>,
    ) -> Result<Self> {
        let raw = self.raw(sql, args)?;
        Update::Reset(Some(Condition::Raw(raw))).apply(&mut self.state.filter);
        Ok(self)
    }

    pub fn and_raw(mut self, sql: &str, args: impl IntoIterator<Item = RawArg>) -> Result<Self> {
        let raw = self.raw(sql, args)?;
        Update::Combine(Logical::And, Condition::Raw(raw)).apply(&mut self.state.filter);
        Ok(self)
    }

    pub fn or_raw(mut self, sql: &str, args: impl IntoIterator<Item = RawArg>) -> Result<Self> {
        let raw = self.raw(sql, args)?;
        Update::Combine(Logical::Or, Condition::Raw(raw)).apply(&mut self.state.filter);
        Ok(self)
    }

    /// `(filter) AND EXISTS (query)`
    pub fn where_exists(mut self, query: impl IntoSubquery) -> Result<Self> {
        let node = exists(query).into_node();
        let cond = self.predicate(node)?;
        Update::Combine(Logical::And, cond).apply(&mut self.state.filter);
        Ok(self)
    }

    /// Adds a condition that is always ANDed into WHERE and survives
    /// [`r#where`](Self::r#where) and [`clear_where`](Self::clear_where).
    pub fn ensure<P: IntoPredicate>(mut self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let cond = self.predicate(f(self.root()).into_predicate())?;
        Update::Combine(Logical::And, cond).apply(&mut self.state.ensure);
        Ok(self)
    }

    pub fn ensure_on<S: Source, P: IntoPredicate>(
        mut self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let cols = S::resolve(&self.state.graph)?;
        let cond = self.predicate(f(cols).into_predicate())?;
        Update::Combine(Logical::And, cond).apply(&mut self.state.ensure);
        Ok(self)
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    fn project(mut self, projection: impl IntoProjection, distinct: bool) -> Result<Self> {
        let items = self.state.walker().projection(projection.into_members())?;
        self.state.projection = Projection::Items(items);
        self.state.distinct = distinct;
        Ok(self)
    }

    /// Replaces the SELECT list.
    ///
    /// ```ignore
    /// q.select(|p| (p.id, p.first_name.alias("Name"), alias(count_all(), "Total")))?
    /// ```
    pub fn select<P: IntoProjection>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let projection = f(self.root());
        self.project(projection, false)
    }

    pub fn select_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let projection = f(S::resolve(&self.state.graph)?);
        self.project(projection, false)
    }

    pub fn select_distinct<P: IntoProjection>(
        self,
        f: impl FnOnce(T::Columns) -> P,
    ) -> Result<Self> {
        let projection = f(self.root());
        self.project(projection, true)
    }

    pub fn select_distinct_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let projection = f(S::resolve(&self.state.graph)?);
        self.project(projection, true)
    }

    /// SELECT list from field names, matched case-insensitively.
    ///
    /// Accepts `Field`, `Table.Field` and `Table.*`. Names that match
    /// nothing are dropped; if nothing matches the default list is kept.
    pub fn select_fields<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        let items = fields::select_items(&self.state.graph, names);
        self.state.projection = if items.is_empty() {
            Projection::All
        } else {
            Projection::Items(items)
        };
        self
    }

    /// Caller-written SELECT list, without the `SELECT` keyword.
    pub fn select_raw(mut self, sql: &str, args: impl IntoIterator<Item = RawArg>) -> Result<Self> {
        let raw = self.raw(sql, args)?;
        self.state.projection = Projection::Raw(raw);
        Ok(self)
    }

    /// Back to every column of every registered table.
    pub fn clear_select(mut self) -> Self {
        self.state.projection = Projection::All;
        self.state.distinct = false;
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.state.distinct = distinct;
        self
    }

    // =========================================================================
    // GROUP BY / HAVING
    // =========================================================================

    fn grouped(mut self, keys: impl IntoProjection) -> Result<Self> {
        self.state.group_by = self.state.walker().keys(keys.into_members())?;
        Ok(self)
    }

    /// Replaces the GROUP BY keys. Aliases on the keys are not rendered.
    pub fn group_by<P: IntoProjection>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let keys = f(self.root());
        self.grouped(keys)
    }

    pub fn group_by_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(S::resolve(&self.state.graph)?);
        self.grouped(keys)
    }

    /// Caller-written GROUP BY list, without the keywords.
    pub fn group_by_raw(mut self, sql: impl Into<String>) -> Self {
        self.state.group_by = vec![Scalar::Raw(RawSql::text(sql))];
        self
    }

    pub fn clear_group_by(mut self) -> Self {
        self.state.group_by.clear();
        self
    }

    /// Replaces the HAVING condition.
    pub fn having<P: IntoPredicate>(mut self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let cond = self.predicate(f(self.root()).into_predicate())?;
        Update::Reset(Some(cond)).apply(&mut self.state.having);
        Ok(self)
    }

    pub fn having_on<S: Source, P: IntoPredicate>(
        mut self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let cols = S::resolve(&self.state.graph)?;
        let cond = self.predicate(f(cols).into_predicate())?;
        Update::Reset(Some(cond)).apply(&mut self.state.having);
        Ok(self)
    }

    pub fn having_raw(mut self, sql: &str, args: impl IntoIterator<Item = RawArg>) -> Result<Self> {
        let raw = self.raw(sql, args)?;
        Update::Reset(Some(Condition::Raw(raw))).apply(&mut self.state.having);
        Ok(self)
    }

    // =========================================================================
    // ORDER BY
    // =========================================================================

    fn ordered(
        mut self,
        keys: impl IntoProjection,
        descending: bool,
        append: bool,
    ) -> Result<Self> {
        let items = self
            .state
            .walker()
            .keys(keys.into_members())?
            .into_iter()
            .map(|expr| OrderItem::new(expr, descending))
            .collect();
        let update = if append {
            OrderUpdate::Append(items)
        } else {
            OrderUpdate::Reset(items)
        };
        update.apply(&mut self.state.order);
        Ok(self)
    }

    /// Replaces the ordering, ascending.
    pub fn order_by<P: IntoProjection>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let keys = f(self.root());
        self.ordered(keys, false, false)
    }

    pub fn order_by_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(S::resolve(&self.state.graph)?);
        self.ordered(keys, false, false)
    }

    pub fn order_by_descending<P: IntoProjection>(
        self,
        f: impl FnOnce(T::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(self.root());
        self.ordered(keys, true, false)
    }

    pub fn order_by_descending_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(S::resolve(&self.state.graph)?);
        self.ordered(keys, true, false)
    }

    /// Appends ascending keys.
    pub fn then_by<P: IntoProjection>(self, f: impl FnOnce(T::Columns) -> P) -> Result<Self> {
        let keys = f(self.root());
        self.ordered(keys, false, true)
    }

    pub fn then_by_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(S::resolve(&self.state.graph)?);
        self.ordered(keys, false, true)
    }

    pub fn then_by_descending<P: IntoProjection>(
        self,
        f: impl FnOnce(T::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(self.root());
        self.ordered(keys, true, true)
    }

    pub fn then_by_descending_on<S: Source, P: IntoProjection>(
        self,
        f: impl FnOnce(S::Columns) -> P,
    ) -> Result<Self> {
        let keys = f(S::resolve(&self.state.graph)?);
        self.ordered(keys, true, true)
    }

    /// Replaces the ordering from field names.
    ///
    /// `-Field` and `Field DESC` sort descending. `Random` sorts randomly.
    pub fn order_by_fields<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        let items = fields::order_items(&self.state.graph, names)?;
        OrderUpdate::Reset(items).apply(&mut self.state.order);
        Ok(self)
    }

    /// Like [`order_by_fields`](Self::order_by_fields) with every direction flipped.
    pub fn order_by_fields_descending<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        let items = fields::order_items(&self.state.graph, names)?
            .into_iter()
            .map(|item| OrderItem::new(item.expr, !item.descending))
            .collect();
        OrderUpdate::Reset(items).apply(&mut self.state.order);
        Ok(self)
    }

    /// Caller-written ORDER BY list, without the keywords.
    pub fn order_by_raw(mut self, sql: impl Into<String>) -> Self {
        let item = OrderItem::new(Scalar::Raw(RawSql::text(sql)), false);
        OrderUpdate::Reset(vec![item]).apply(&mut self.state.order);
        self
    }

    /// Orders by the dialect's random function.
    pub fn order_by_random(mut self) -> Self {
        OrderUpdate::Reset(vec![OrderItem::new(Scalar::Random, false)]).apply(&mut self.state.order);
        self
    }

    pub fn clear_order_by(mut self) -> Self {
        self.state.order.clear();
        self
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Skips `skip` rows and returns at most `rows`.
    pub fn limit(mut self, skip: u64, rows: u64) -> Self {
        self.state.offset = Some(skip);
        self.state.rows = Some(rows);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.state.offset = Some(skip);
        self
    }

    pub fn take(mut self, rows: u64) -> Self {
        self.state.rows = Some(rows);
        self
    }

    pub fn clear_limit(mut self) -> Self {
        self.state.offset = None;
        self.state.rows = None;
        self
    }

    // =========================================================================
    // Joins
    // =========================================================================

    fn register<U: Table>(&mut self, alias: Option<&'static str>) -> Result<usize> {
        self.state
            .graph
            .register(TableRef::new(U::def(), alias.map(Cow::Borrowed)))
    }

    /// Joins `U` on a condition inferred from foreign keys.
    ///
    /// Cross joins without a linking key get no condition.
    fn join_inferred<U: Table>(mut self, join: Join) -> Result<Self> {
        let slot = self.register::<U>(join.alias)?;
        let on = match join.kind {
            JoinKind::Cross => self
                .state
                .graph
                .infer_condition(slot)?
                .map_or(JoinOn::None, JoinOn::Condition),
            _ => JoinOn::Condition(self.state.graph.require_condition(slot)?),
        };
        self.state.graph.push_edge(JoinEdge {
            kind: join.kind,
            slot: Some(slot),
            on,
        });
        Ok(self)
    }

    /// Joins `U` on a predicate over `left` and `U`.
    ///
    /// `left` is resolved before `U` is registered, so the predicate can only
    /// reach tables that were already part of the query.
    fn join_predicate<U: Table, L, P: IntoPredicate>(
        mut self,
        join: Join,
        left: L,
        f: impl FnOnce(L, U::Columns) -> P,
    ) -> Result<Self> {
        let slot = self.register::<U>(join.alias)?;
        let node = f(left, U::columns(Slot::Bound(slot))).into_predicate();
        let cond = self.predicate(node)?;
        self.state.graph.push_edge(JoinEdge {
            kind: join.kind,
            slot: Some(slot),
            on: JoinOn::Condition(cond),
        });
        Ok(self)
    }

    /// `INNER JOIN U` on an inferred foreign key.
    pub fn join<U: Table>(self) -> Result<Self> {
        self.join_inferred::<U>(Join::new())
    }

    /// `INNER JOIN U ON <pred(T, U)>`
    pub fn join_on<U: Table, P: IntoPredicate>(
        self,
        f: impl FnOnce(T::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = self.root();
        self.join_predicate::<U, _, P>(Join::new(), left, f)
    }

    /// `INNER JOIN U ON <pred(S, U)>` where `S` is any registered table.
    pub fn join_from<U: Table, S: Source, P: IntoPredicate>(
        self,
        f: impl FnOnce(S::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = S::resolve(&self.state.graph)?;
        self.join_predicate::<U, _, P>(Join::new(), left, f)
    }

    /// Join described by `join` (kind and alias) on an inferred foreign key.
    ///
    /// ```ignore
    /// const MANAGER: Join = Join::new().left().alias("mgr");
    /// q.join_with::<Employee>(MANAGER)?
    /// ```
    pub fn join_with<U: Table>(self, join: Join) -> Result<Self> {
        self.join_inferred::<U>(join)
    }

    pub fn join_with_on<U: Table, S: Source, P: IntoPredicate>(
        self,
        join: Join,
        f: impl FnOnce(S::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = S::resolve(&self.state.graph)?;
        self.join_predicate::<U, _, P>(join, left, f)
    }

    pub fn left_join<U: Table>(self) -> Result<Self> {
        self.join_inferred::<U>(Join::new().left())
    }

    pub fn left_join_on<U: Table, P: IntoPredicate>(
        self,
        f: impl FnOnce(T::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = self.root();
        self.join_predicate::<U, _, P>(Join::new().left(), left, f)
    }

    pub fn right_join<U: Table>(self) -> Result<Self> {
        self.join_inferred::<U>(Join::new().right())
    }

    pub fn right_join_on<U: Table, P: IntoPredicate>(
        self,
        f: impl FnOnce(T::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = self.root();
        self.join_predicate::<U, _, P>(Join::new().right(), left, f)
    }

    pub fn full_join<U: Table>(self) -> Result<Self> {
        self.join_inferred::<U>(Join::new().full())
    }

    pub fn full_join_on<U: Table, P: IntoPredicate>(
        self,
        f: impl FnOnce(T::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = self.root();
        self.join_predicate::<U, _, P>(Join::new().full(), left, f)
    }

    /// `CROSS JOIN U`. A foreign key linking the tables, if any, filters the
    /// product through WHERE.
    pub fn cross_join<U: Table>(self) -> Result<Self> {
        self.join_inferred::<U>(Join::new().cross())
    }

    /// `CROSS JOIN U` with the predicate ANDed into WHERE.
    pub fn cross_join_on<U: Table, P: IntoPredicate>(
        self,
        f: impl FnOnce(T::Columns, U::Columns) -> P,
    ) -> Result<Self> {
        let left = self.root();
        self.join_predicate::<U, _, P>(Join::new().cross(), left, f)
    }

    /// Appends a caller-written join clause verbatim.
    pub fn custom_join(mut self, sql: impl Into<String>) -> Self {
        self.state.graph.push_edge(JoinEdge {
            kind: JoinKind::Custom,
            slot: None,
            on: JoinOn::Raw(RawSql::text(sql)),
        });
        self
    }

    /// Appends a caller-written join clause and registers `U` so its columns
    /// can be selected and filtered on.
    pub fn custom_join_table<U: Table>(
        mut self,
        alias: Option<&'static str>,
        sql: impl Into<String>,
    ) -> Result<Self> {
        let slot = self.register::<U>(alias)?;
        self.state.graph.push_edge(JoinEdge {
            kind: JoinKind::Custom,
            slot: Some(slot),
            on: JoinOn::Raw(RawSql::text(sql)),
        });
        Ok(self)
    }

    // =========================================================================
    // Raw SQL helpers
    // =========================================================================

    /// Quoted name of one column of `U`, for use inside raw fragments.
    ///
    /// With `prefix_table`, the column is qualified by the alias or table
    /// name `U` is registered under in this query.
    pub fn column<U: Table, X>(
        &self,
        f: impl FnOnce(U::Columns) -> Col<X>,
        prefix_table: bool,
    ) -> Result<String> {
        let column = f(U::columns(Slot::Any)).column_ref();
        let def = column.table.column(column.field)?;
        let dialect = &self.state.dialect;
        let mut out = String::new();
        if prefix_table {
            out.push_str(&self.table::<U>());
            out.push('.');
        }
        dialect.write_ident(&mut out, &def.name(dialect.naming));
        Ok(out)
    }

    /// Column handles for the registration of `U` under `alias`.
    ///
    /// Handles are `Copy`, so they can be captured by later closures:
    ///
    /// ```ignore
    /// let q = q.join_with::<Employee>(Join::new().left().alias("mgr"))?;
    /// let mgr = q.aliased::<Employee>("mgr");
    /// let q = q.r#where(move |_| eq(mgr.name, "Ann"))?;
    /// ```
    pub fn aliased<U: Table>(&self, alias: &'static str) -> U::Columns {
        U::columns(Slot::Alias(alias))
    }

    /// Quoted alias or table name of `U` in this query.
    pub fn table<U: Table>(&self) -> String {
        let naming = self.state.dialect.naming;
        let name = match self.state.graph.slot_of(U::def(), None) {
            Ok(slot) => self
                .state
                .graph
                .table(slot)
                .map_or_else(|| U::def().name(naming), |t| t.qualifier(naming)),
            Err(_) => U::def().name(naming),
        };
        self.state.dialect.quote_ident(&name)
    }

    // =========================================================================
    // Parameters and tags
    // =========================================================================

    /// Registers a parameter under the next sequential name.
    pub fn add_param(&mut self, value: impl Into<Value>) -> ParamRef {
        self.state.binder.param_ref(value.into())
    }

    /// Registers a parameter under `name`, rejecting a name already in use.
    pub fn add_named_param(&mut self, name: &str, value: impl Into<Value>) -> Result<ParamRef> {
        self.state.binder.named_param_ref(name, value.into())
    }

    /// Adds a `-- text` comment line ahead of the statement.
    pub fn tag(mut self, text: impl Into<String>) -> Self {
        self.state.tags.push(text.into());
        self
    }
}

impl<T> Query<T> {
    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    #[inline]
    pub fn root_table(&self) -> &TableRef {
        self.state.graph.root()
    }

    #[inline]
    pub fn joins(&self) -> &[JoinEdge] {
        self.state.graph.edges()
    }

    /// Every parameter bound so far, including ones no clause references.
    #[inline]
    pub fn params(&self) -> &[Param] {
        self.state.binder.params()
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.state.dialect
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.state.config
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn to_select_statement(&self) -> Statement {
        Renderer::new(&self.state).select_statement()
    }

    /// `COUNT(*)` over the filtered rows. With GROUP BY, the sum of the
    /// group sizes.
    pub fn to_count_statement(&self) -> Statement {
        Renderer::new(&self.state).count_statement()
    }

    /// Number of rows the SELECT returns. With GROUP BY, the number of groups.
    pub fn to_row_count_statement(&self) -> Statement {
        Renderer::new(&self.state).row_count_statement()
    }

    /// The SELECT with every parameter inlined, for logs.
    pub fn to_merged_params_sql(&self) -> String {
        Renderer::new(&self.state).merged_params_sql()
    }
}
