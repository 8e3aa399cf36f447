//! SQL renderer.
//!
//! Serializes a [`QueryState`] into a [`Statement`]. Everything is already
//! resolved and bound by the time it gets here, so rendering cannot fail: it
//! only asks the [`Dialect`] how each piece is spelled.

use std::borrow::Cow;

use hashbrown::HashSet;
use ormlite_types::{BitSyntax, Dialect, Paging, SubstringStyle};

use crate::condition::{ArithOp, CompareOp, Condition, Func, RawPart, RawSql, Scalar};
use crate::join::{JoinKind, JoinOn, TableRef};
use crate::ormlite_trace_query;
use crate::param::{Param, ParamId};
use crate::query::{Projection, QueryState, SelectItem};
use crate::schema::ColumnDef;
use crate::sql::{FragmentPart, SQL, SQLChunk, Token};

/// Rendered SQL text and its parameters in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

/// Alias of the derived table wrapping a grouped count.
const COUNT_TABLE: &str = "t";
/// Column and table alias used by row counts.
const COUNT_ALIAS: &str = "COUNT";
/// Derived-table alias of the ROWNUM paging wrapper.
const ROWNUM_TABLE: &str = "_ormlite_page";
const ROWNUM_COLUMN: &str = "_ormlite_rn";

pub struct Renderer<'a> {
    state: &'a QueryState,
    dialect: &'a Dialect,
    /// Whether columns are prefixed with their table
    qualify: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(state: &'a QueryState) -> Self {
        let graph = state.graph();
        let qualify = graph.tables().len() > 1
            || graph.has_aliases()
            || state.config().include_table_prefixes;
        Self {
            state,
            dialect: state.dialect(),
            qualify,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn select_statement(&self) -> Statement {
        let sql = self.tagged(self.select());
        self.finish("select", &sql)
    }

    /// `SELECT COUNT(*)` over the filtered rows.
    ///
    /// With GROUP BY the per-group counts are summed, so the result is the
    /// number of rows across all groups.
    pub fn count_statement(&self) -> Statement {
        let body = if self.state.group_by.is_empty() {
            SQL::token(Token::SELECT)
                .append(SQL::func("COUNT", SQL::token(Token::STAR)))
                .append(self.from_clause())
                .append(self.where_clause())
        } else {
            let inner = SQL::token(Token::SELECT)
                .append(SQL::func("COUNT", SQL::token(Token::STAR)))
                .push(Token::AS)
                .push(SQLChunk::ident("cnt"))
                .append(self.from_clause())
                .append(self.where_clause())
                .append(self.group_clause())
                .append(self.having_clause());
            let sum = SQL::func("SUM", SQL::ident("cnt"))
                .push(Token::COMMA)
                .push(SQLChunk::Number(0));
            SQL::token(Token::SELECT)
                .append(SQL::func("COALESCE", sum))
                .push(Token::FROM)
                .append(inner.parens())
                .append(self.table_alias(COUNT_TABLE))
        };
        let sql = self.tagged(body);
        self.finish("count", &sql)
    }

    /// `SELECT COUNT(*) FROM (<select>) AS "COUNT"`: the number of rows the
    /// SELECT returns, so the number of groups when grouped.
    pub fn row_count_statement(&self) -> Statement {
        let body = SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::FROM)
            .append(self.nested().parens())
            .append(self.table_alias(COUNT_ALIAS));
        let sql = self.tagged(body);
        self.finish("row_count", &sql)
    }

    /// The SELECT with parameters inlined as literals.
    pub fn merged_params_sql(&self) -> String {
        self.tagged(self.select()).inline(self.dialect)
    }

    fn finish(&self, kind: &'static str, sql: &SQL) -> Statement {
        let (sql, params) = sql.build(self.dialect);
        ormlite_trace_query!(kind, sql, params.len());
        #[cfg(not(feature = "tracing"))]
        let _ = kind;
        Statement { sql, params }
    }

    fn tagged(&self, body: SQL) -> SQL {
        if self.state.tags.is_empty() {
            return body;
        }
        let mut sql = SQL::empty();
        for tag in &self.state.tags {
            sql.push_mut(SQLChunk::raw(format!("-- {tag}\n")));
        }
        sql.append(body)
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// The full SELECT, including paging.
    pub fn select(&self) -> SQL {
        match self.dialect.paging {
            Paging::LimitOffset => self.select_unpaged(false).append(self.limit_offset()),
            Paging::OffsetFetch => self.offset_fetch(),
            Paging::RowNum => self.rownum(),
        }
    }

    /// The SELECT as a derived table or subquery. Unpaged OFFSET/FETCH
    /// dialects reject ORDER BY there, and without paging it has no effect.
    fn nested(&self) -> SQL {
        match (self.dialect.paging, self.state.paging()) {
            (Paging::OffsetFetch, (None, None)) => self.select_body(),
            _ => self.select(),
        }
    }

    fn select_unpaged(&self, force_order: bool) -> SQL {
        self.select_body().append(self.order_clause(force_order))
    }

    fn select_body(&self) -> SQL {
        let mut sql = SQL::token(Token::SELECT);
        if self.state.distinct {
            sql.push_mut(Token::DISTINCT);
        }
        sql.append(self.projection())
            .append(self.from_clause())
            .append(self.where_clause())
            .append(self.group_clause())
            .append(self.having_clause())
    }

    fn projection(&self) -> SQL {
        match &self.state.projection {
            Projection::All => self.default_projection(),
            Projection::Items(items) => SQL::join(items.iter().map(|i| self.select_item(i)), Token::COMMA),
            Projection::Raw(raw) => self.raw(raw),
        }
    }

    /// Every column of every registered table. A name already emitted is
    /// aliased `<Table><Column>` so result columns stay distinct.
    fn default_projection(&self) -> SQL {
        let naming = self.dialect.naming;
        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::new();
        for (slot, table) in self.state.graph().tables().iter().enumerate() {
            for column in table.def.columns {
                let name = column.name(naming);
                let expr = self.column(slot, column);
                if seen.insert(name.to_ascii_lowercase()) {
                    columns.push(expr);
                } else {
                    let alias = format!("{}{name}", table.qualifier(naming));
                    seen.insert(alias.to_ascii_lowercase());
                    columns.push(expr.alias(alias));
                }
            }
        }
        SQL::join(columns, Token::COMMA)
    }

    fn select_item(&self, item: &SelectItem) -> SQL {
        let expr = self.scalar(&item.expr);
        match &item.alias {
            Some(alias) => expr.alias(alias.clone()),
            None => expr,
        }
    }

    fn from_clause(&self) -> SQL {
        let graph = self.state.graph();
        let mut sql = SQL::token(Token::FROM).append(self.table_ref(graph.root()));
        for edge in graph.edges() {
            let table = edge.slot.and_then(|slot| graph.table(slot));
            match (edge.kind, table) {
                (JoinKind::Custom, _) | (_, None) => {
                    if let JoinOn::Raw(raw) = &edge.on {
                        sql.append_mut(self.raw(raw));
                    }
                }
                (kind, Some(table)) => {
                    sql.append_mut(kind.to_sql());
                    sql.append_mut(self.table_ref(table));
                    match &edge.on {
                        // cross join conditions live in WHERE
                        JoinOn::Condition(_) if kind == JoinKind::Cross => {}
                        JoinOn::Condition(cond) => {
                            sql.push_mut(Token::ON);
                            sql.append_mut(self.condition(cond));
                        }
                        JoinOn::Raw(raw) => {
                            sql.push_mut(Token::ON);
                            sql.append_mut(self.raw(raw));
                        }
                        JoinOn::None => {}
                    }
                }
            }
        }
        sql
    }

    /// `[schema.]"Table" [AS "alias"]`
    fn table_ref(&self, table: &TableRef) -> SQL {
        let naming = self.dialect.naming;
        let mut sql = SQL::empty();
        if let Some(schema) = table.def.schema {
            sql.push_mut(SQLChunk::ident(schema));
            sql.push_mut(Token::DOT);
        }
        sql.push_mut(SQLChunk::Ident(table.name(naming)));
        match &table.alias {
            Some(alias) => sql.append(self.table_alias(alias.clone())),
            None => sql,
        }
    }

    /// `AS "alias"`, or just `"alias"` where the dialect rejects `AS`.
    fn table_alias(&self, alias: impl Into<Cow<'static, str>>) -> SQL {
        if self.dialect.table_alias_keyword {
            SQL::token(Token::AS).push(SQLChunk::Ident(alias.into()))
        } else {
            SQL::ident(alias)
        }
    }

    fn where_clause(&self) -> SQL {
        let cross = self
            .state
            .graph()
            .edges()
            .iter()
            .filter(|e| e.kind == JoinKind::Cross)
            .filter_map(|e| match &e.on {
                JoinOn::Condition(cond) => Some(cond.clone()),
                _ => None,
            });
        let all = Condition::all(
            cross
                .chain(self.state.ensure.clone())
                .chain(self.state.filter.clone()),
        );
        match all {
            Some(cond) => SQL::token(Token::WHERE).append(self.condition(&cond)),
            None => SQL::empty(),
        }
    }

    fn group_clause(&self) -> SQL {
        if self.state.group_by.is_empty() {
            return SQL::empty();
        }
        SQL::token(Token::GROUP).push(Token::BY).append(SQL::join(
            self.state.group_by.iter().map(|k| self.scalar(k)),
            Token::COMMA,
        ))
    }

    fn having_clause(&self) -> SQL {
        match &self.state.having {
            Some(cond) => SQL::token(Token::HAVING).append(self.condition(cond)),
            None => SQL::empty(),
        }
    }

    /// ORDER BY. With `force`, an empty ordering falls back to the root
    /// primary key, then to `(SELECT NULL)`.
    fn order_clause(&self, force: bool) -> SQL {
        let keys: Vec<SQL> = if self.state.order.is_empty() {
            if !force {
                return SQL::empty();
            }
            let root = self.state.graph().root();
            match root.def.primary_key() {
                Some(pk) => vec![self.column(0, pk)],
                None => vec![SQL::token(Token::SELECT).push(Token::NULL).parens()],
            }
        } else {
            self.state
                .order
                .iter()
                .map(|item| {
                    let key = self.scalar(&item.expr);
                    if item.descending {
                        key.push(Token::DESC)
                    } else {
                        key
                    }
                })
                .collect()
        };
        SQL::token(Token::ORDER)
            .push(Token::BY)
            .append(SQL::join(keys, Token::COMMA))
    }

    // =========================================================================
    // Paging
    // =========================================================================

    fn limit_offset(&self) -> SQL {
        let (offset, rows) = self.state.paging();
        let offset = offset.filter(|&o| o > 0);
        if offset.is_none() && rows.is_none() {
            return SQL::empty();
        }
        let rows = rows.unwrap_or(self.state.config().max_rows_without_limit);
        let mut sql = SQL::token(Token::LIMIT).push(SQLChunk::Number(to_i64(rows)));
        if let Some(offset) = offset {
            sql = sql.push(Token::OFFSET).push(SQLChunk::Number(to_i64(offset)));
        }
        sql
    }

    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, which needs an ORDER BY.
    fn offset_fetch(&self) -> SQL {
        let (offset, rows) = self.state.paging();
        if offset.is_none() && rows.is_none() {
            return self.select_unpaged(false);
        }
        let mut sql = self
            .select_unpaged(true)
            .push(Token::OFFSET)
            .push(SQLChunk::Number(to_i64(offset.unwrap_or(0))))
            .push(Token::ROWS);
        if let Some(rows) = rows {
            sql = sql
                .push(Token::FETCH)
                .push(Token::NEXT)
                .push(SQLChunk::Number(to_i64(rows)))
                .push(Token::ROWS)
                .push(Token::ONLY);
        }
        sql
    }

    /// Nested `ROWNUM` filtering.
    ///
    /// ```text
    /// SELECT * FROM (
    ///   SELECT "_ormlite_page".*, ROWNUM "_ormlite_rn" FROM (<select>) "_ormlite_page"
    ///   WHERE ROWNUM <= offset + rows
    /// ) WHERE "_ormlite_rn" > offset
    /// ```
    fn rownum(&self) -> SQL {
        let (offset, rows) = self.state.paging();
        let inner = self.select_unpaged(false);
        if offset.is_none() && rows.is_none() {
            return inner;
        }
        let offset = offset.unwrap_or(0);
        let rows = rows.unwrap_or(self.state.config().max_rows_without_limit);
        let upper = offset.saturating_add(rows);

        let numbered = SQL::token(Token::SELECT)
            .push(SQLChunk::ident(ROWNUM_TABLE))
            .push(Token::DOT)
            .push(Token::STAR)
            .push(Token::COMMA)
            .push(SQLChunk::raw("ROWNUM"))
            .push(SQLChunk::ident(ROWNUM_COLUMN))
            .push(Token::FROM)
            .append(inner.parens())
            .push(SQLChunk::ident(ROWNUM_TABLE))
            .push(Token::WHERE)
            .push(SQLChunk::raw("ROWNUM"))
            .push(Token::LE)
            .push(SQLChunk::Number(to_i64(upper)));

        SQL::token(Token::SELECT)
            .push(Token::STAR)
            .push(Token::FROM)
            .append(numbered.parens())
            .push(Token::WHERE)
            .push(SQLChunk::ident(ROWNUM_COLUMN))
            .push(Token::GT)
            .push(SQLChunk::Number(to_i64(offset)))
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    fn condition(&self, cond: &Condition) -> SQL {
        match cond {
            Condition::Constant(true) => SQL::raw("(1=1)"),
            Condition::Constant(false) => SQL::raw("(1=0)"),
            Condition::Compare { left, op, right } => self
                .scalar(left)
                .push(compare_token(*op))
                .append(self.scalar(right)),
            Condition::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                let mut sql = self.scalar(expr);
                if *negated {
                    sql.push_mut(Token::NOT);
                }
                sql.push_mut(Token::LIKE);
                sql.append_mut(self.scalar(pattern));
                if let Some(escape) = escape {
                    sql.push_mut(Token::ESCAPE);
                    sql.push_mut(SQLChunk::raw(format!("'{escape}'")));
                }
                sql
            }
            Condition::In {
                expr,
                values,
                negated,
            } => {
                let list = if values.is_empty() {
                    SQL::token(Token::NULL)
                } else {
                    SQL::join(values.iter().map(|v| self.scalar(v)), Token::COMMA)
                };
                let mut sql = self.scalar(expr);
                if *negated {
                    sql.push_mut(Token::NOT);
                }
                sql.push(Token::IN).append(list.parens())
            }
            Condition::InQuery {
                expr,
                query,
                negated,
            } => {
                let mut sql = self.scalar(expr);
                if *negated {
                    sql.push_mut(Token::NOT);
                }
                sql.push(Token::IN).append(self.subquery(query))
            }
            Condition::Exists { query, negated } => {
                let mut sql = SQL::empty();
                if *negated {
                    sql.push_mut(Token::NOT);
                }
                sql.push(Token::EXISTS).append(self.subquery(query))
            }
            Condition::IsNull { expr, negated } => {
                let mut sql = self.scalar(expr).push(Token::IS);
                if *negated {
                    sql.push_mut(Token::NOT);
                }
                sql.push(Token::NULL)
            }
            Condition::And(left, right) => self
                .condition(left)
                .parens()
                .push(Token::AND)
                .append(self.condition(right).parens()),
            Condition::Or(left, right) => self
                .condition(left)
                .parens()
                .push(Token::OR)
                .append(self.condition(right).parens()),
            Condition::Not(inner) => SQL::token(Token::NOT).append(self.condition(inner).parens()),
            Condition::Raw(raw) => self.raw(raw),
        }
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    fn scalar(&self, scalar: &Scalar) -> SQL {
        match scalar {
            Scalar::Column { slot, column } => self.column(*slot, column),
            Scalar::Param(id) => self.param(*id),
            Scalar::Null => SQL::token(Token::NULL),
            Scalar::Bool(b) => SQL::raw(self.dialect.bool_literal(*b)),
            Scalar::Number(n) => SQL::number(*n),
            Scalar::Star => SQL::token(Token::STAR),
            Scalar::Random => SQL::raw(self.dialect.random_function),
            Scalar::Neg(inner) => SQL::raw("-").append(self.scalar(inner).parens()),
            Scalar::Binary { op, left, right } => self.binary(*op, left, right),
            Scalar::Func { func, args } => self.func(*func, args),
            Scalar::Substring { expr, start, len } => self.substring(expr, start, len.as_deref()),
            Scalar::Cast { expr, ty } => SQL::func(
                "CAST",
                self.scalar(expr)
                    .push(Token::AS)
                    .push(SQLChunk::raw(self.dialect.cast_type(*ty))),
            ),
            Scalar::Case {
                when,
                then,
                otherwise,
            } => SQL::token(Token::CASE)
                .push(Token::WHEN)
                .append(self.condition(when))
                .push(Token::THEN)
                .append(self.scalar(then))
                .push(Token::ELSE)
                .append(self.scalar(otherwise))
                .push(Token::END),
            Scalar::Predicate(cond) => self.condition(cond).parens(),
            Scalar::Raw(raw) => self.raw(raw),
            Scalar::Subquery(query) => self.subquery(query),
        }
    }

    fn column(&self, slot: usize, column: &ColumnDef) -> SQL {
        let naming = self.dialect.naming;
        let name = SQLChunk::Ident(column.name(naming));
        match self.state.graph().table(slot) {
            Some(table) if self.qualify => SQL::ident(table.qualifier(naming))
                .push(Token::DOT)
                .push(name),
            _ => SQL::from(name),
        }
    }

    fn param(&self, id: ParamId) -> SQL {
        match self.state.binder().get(id) {
            Some(p) => SQL::param(p.name.clone(), p.value.clone()),
            None => SQL::token(Token::NULL),
        }
    }

    /// Parenthesized so the tree shape, not SQL precedence, decides grouping.
    fn binary(&self, op: ArithOp, left: &Scalar, right: &Scalar) -> SQL {
        let (left, right) = (self.scalar(left), self.scalar(right));
        let operator: SQLChunk = match op {
            ArithOp::Add => Token::PLUS.into(),
            ArithOp::Sub => Token::MINUS.into(),
            ArithOp::Mul => Token::STAR.into(),
            ArithOp::Div => Token::SLASH.into(),
            ArithOp::Rem => Token::PERCENT.into(),
            ArithOp::Bit(bit) => match self.dialect.bitwise.get(bit) {
                Some(BitSyntax::Function(name)) => {
                    return SQL::func(name, left.push(Token::COMMA).append(right));
                }
                Some(BitSyntax::Infix(symbol)) => SQLChunk::raw(symbol),
                None => SQLChunk::raw(bit.as_str()),
            },
        };
        left.push(operator).append(right).parens()
    }

    fn func(&self, func: Func, args: &[Scalar]) -> SQL {
        let list = SQL::join(args.iter().map(|a| self.scalar(a)), Token::COMMA);
        let name = match func {
            Func::Upper => "UPPER",
            Func::Lower => "LOWER",
            Func::Trim => "TRIM",
            Func::LTrim => "LTRIM",
            Func::RTrim => "RTRIM",
            Func::Length => self.dialect.length_function,
            Func::Count => "COUNT",
            Func::CountDistinct => return SQL::func("COUNT", SQL::token(Token::DISTINCT).append(list)),
            Func::Sum => "SUM",
            Func::Min => "MIN",
            Func::Max => "MAX",
            Func::Avg => "AVG",
            Func::Coalesce => "COALESCE",
        };
        SQL::func(name, list)
    }

    fn substring(&self, expr: &Scalar, start: &Scalar, len: Option<&Scalar>) -> SQL {
        let (expr, start) = (self.scalar(expr), self.scalar(start));
        let len = len.map(|l| self.scalar(l));
        match self.dialect.substring {
            SubstringStyle::FromFor => {
                let mut args = expr.push(Token::FROM).append(start);
                if let Some(len) = len {
                    args = args.push(Token::FOR).append(len);
                }
                SQL::func("substring", args)
            }
            SubstringStyle::Substr => {
                let mut args = expr.push(Token::COMMA).append(start);
                if let Some(len) = len {
                    args = args.push(Token::COMMA).append(len);
                }
                SQL::func("substr", args)
            }
            SubstringStyle::Substring => {
                // the length is mandatory; the whole string is long enough
                let len =
                    len.unwrap_or_else(|| SQL::func(self.dialect.length_function, expr.clone()));
                SQL::func(
                    "substring",
                    expr.push(Token::COMMA)
                        .append(start)
                        .push(Token::COMMA)
                        .append(len),
                )
            }
        }
    }

    /// Caller text with its bound arguments, as one fragment.
    fn raw(&self, raw: &RawSql) -> SQL {
        let binder = self.state.binder();
        let param = |id: ParamId| match binder.get(id) {
            Some(p) => FragmentPart::Param {
                name: p.name.clone(),
                value: p.value.clone(),
            },
            None => FragmentPart::Text(Cow::Borrowed("NULL")),
        };

        let mut parts = Vec::with_capacity(raw.parts.len());
        for part in &raw.parts {
            match part {
                RawPart::Text(text) => parts.push(FragmentPart::Text(Cow::Owned(text.clone()))),
                RawPart::Param(id) => parts.push(param(*id)),
                RawPart::List(ids) => {
                    for (i, id) in ids.iter().enumerate() {
                        if i > 0 {
                            parts.push(FragmentPart::Text(Cow::Borrowed(", ")));
                        }
                        parts.push(param(*id));
                    }
                }
                RawPart::Null => parts.push(FragmentPart::Text(Cow::Borrowed("NULL"))),
            }
        }
        SQL::from(SQLChunk::Fragment(parts))
    }

    /// `(<select>)` rendered against the subquery's own state.
    fn subquery(&self, query: &QueryState) -> SQL {
        Renderer::new(query).nested().parens()
    }
}

const fn compare_token(op: CompareOp) -> Token {
    match op {
        CompareOp::Eq => Token::EQ,
        CompareOp::Ne => Token::NE,
        CompareOp::Lt => Token::LT,
        CompareOp::Le => Token::LE,
        CompareOp::Gt => Token::GT,
        CompareOp::Ge => Token::GE,
    }
}

#[inline]
fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
