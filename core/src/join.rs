//! Join graph for SQL JOIN operations
//!
//! Every table a query touches is registered here exactly once, in
//! declaration order: the root first, then one entry per join. Column
//! handles refer to tables by their position (slot) in this list.

use std::borrow::Cow;

use ormlite_types::Naming;

use crate::condition::{CompareOp, Condition, RawSql, Scalar};
use crate::error::{OrmLiteError, Result};
use crate::ormlite_trace_join;
use crate::schema::TableDef;
use crate::sql::{SQL, Token};

// =============================================================================
// Join Kind
// =============================================================================

/// The type of JOIN operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
    /// Caller-written join clause
    Custom,
}

impl JoinKind {
    /// Keywords preceding the joined table.
    pub fn to_sql(self) -> SQL {
        let tokens: &[Token] = match self {
            JoinKind::Inner => &[Token::INNER, Token::JOIN],
            JoinKind::Left => &[Token::LEFT, Token::JOIN],
            JoinKind::Right => &[Token::RIGHT, Token::JOIN],
            JoinKind::Full => &[Token::FULL, Token::JOIN],
            JoinKind::Cross => &[Token::CROSS, Token::JOIN],
            JoinKind::Custom => &[],
        };
        tokens.iter().copied().collect()
    }
}

// =============================================================================
// Join Builder Struct
// =============================================================================

/// Builder for a join specification.
///
/// Uses const fn methods so specifications can be declared as constants.
///
/// ```
/// use ormlite_core::join::{Join, JoinKind};
///
/// const MANAGER: Join = Join::new().left().alias("mgr");
/// assert_eq!(MANAGER.kind, JoinKind::Left);
/// assert_eq!(MANAGER.alias, Some("mgr"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Join {
    pub kind: JoinKind,
    pub alias: Option<&'static str>,
}

impl Join {
    /// Creates a new Join with default settings (INNER JOIN, no alias)
    pub const fn new() -> Self {
        Self {
            kind: JoinKind::Inner,
            alias: None,
        }
    }

    /// Makes this an INNER join
    pub const fn inner(mut self) -> Self {
        self.kind = JoinKind::Inner;
        self
    }

    /// Makes this a LEFT join
    pub const fn left(mut self) -> Self {
        self.kind = JoinKind::Left;
        self
    }

    /// Makes this a RIGHT join
    pub const fn right(mut self) -> Self {
        self.kind = JoinKind::Right;
        self
    }

    /// Makes this a FULL join
    pub const fn full(mut self) -> Self {
        self.kind = JoinKind::Full;
        self
    }

    /// Makes this a CROSS join
    pub const fn cross(mut self) -> Self {
        self.kind = JoinKind::Cross;
        self
    }

    /// Registers the joined table under an alias
    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }
}

// =============================================================================
// Graph
// =============================================================================

/// One registration of a table in a query.
#[derive(Debug, Clone)]
pub struct TableRef {
    pub def: &'static TableDef,
    pub alias: Option<Cow<'static, str>>,
}

impl TableRef {
    pub fn new(def: &'static TableDef, alias: Option<Cow<'static, str>>) -> Self {
        Self { def, alias }
    }

    /// Unquoted table name.
    pub fn name(&self, naming: Naming) -> Cow<'static, str> {
        self.def.name(naming)
    }

    /// Name used to qualify columns: the alias if any, else the table name.
    pub fn qualifier(&self, naming: Naming) -> Cow<'static, str> {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.name(naming),
        }
    }
}

#[derive(Debug, Clone)]
pub enum JoinOn {
    Condition(Condition),
    Raw(RawSql),
    None,
}

/// A registered join relationship.
#[derive(Debug, Clone)]
pub struct JoinEdge {
    pub kind: JoinKind,
    /// Slot of the joined table; `None` for a custom join without a table
    pub slot: Option<usize>,
    pub on: JoinOn,
}

#[derive(Debug, Clone)]
pub struct JoinGraph {
    tables: Vec<TableRef>,
    edges: Vec<JoinEdge>,
}

impl JoinGraph {
    pub fn new(root: TableRef) -> Self {
        Self {
            tables: vec![root],
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> &TableRef {
        &self.tables[0]
    }

    #[inline]
    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    #[inline]
    pub fn table(&self, slot: usize) -> Option<&TableRef> {
        self.tables.get(slot)
    }

    #[inline]
    pub fn edges(&self) -> &[JoinEdge] {
        &self.edges
    }

    /// Whether any registration carries an alias.
    pub fn has_aliases(&self) -> bool {
        self.tables.iter().any(|t| t.alias.is_some())
    }

    /// Adds a table and returns its slot.
    ///
    /// A table already in the graph may only be added again under an alias
    /// no other registration uses.
    pub fn register(&mut self, table: TableRef) -> Result<usize> {
        let clash = self.tables.iter().any(|t| match (&table.alias, &t.alias) {
            (None, _) => t.def.same_as(table.def),
            (Some(new), Some(old)) => new == old,
            (Some(_), None) => false,
        });
        if clash {
            return Err(OrmLiteError::AmbiguousTable(
                table.alias.as_deref().unwrap_or(table.def.declared).to_owned(),
            ));
        }
        self.tables.push(table);
        Ok(self.tables.len() - 1)
    }

    #[inline]
    pub(crate) fn edges_mut(&mut self) -> &mut [JoinEdge] {
        &mut self.edges
    }

    pub fn push_edge(&mut self, edge: JoinEdge) {
        self.edges.push(edge);
    }

    /// Finds the registration of `def`, optionally by alias.
    pub fn slot_of(&self, def: &TableDef, alias: Option<&str>) -> Result<usize> {
        let mut candidates = self
            .tables
            .iter()
            .enumerate()
            .filter(|(_, t)| t.def.same_as(def))
            .filter(|(_, t)| alias.is_none_or(|a| t.alias.as_deref() == Some(a)));

        match (candidates.next(), candidates.next()) {
            (Some((slot, _)), None) => Ok(slot),
            (Some(_), Some(_)) => Err(OrmLiteError::AmbiguousTable(def.declared.to_owned())),
            (None, _) => Err(OrmLiteError::UnknownTable(match alias {
                Some(alias) => format!("{} AS {alias}", def.declared),
                None => def.declared.to_owned(),
            })),
        }
    }

    /// Join condition derived from foreign-key metadata for the table at `slot`.
    ///
    /// Looks for a key from the joined table into any earlier table first,
    /// then for a key from an earlier table into the joined one.
    pub fn infer_condition(&self, slot: usize) -> Result<Option<Condition>> {
        let Some(joined) = self.tables.get(slot) else {
            return Ok(None);
        };
        let earlier = &self.tables[..slot];

        for (i, parent) in earlier.iter().enumerate() {
            if let Some((column, fk)) = joined.def.foreign_key_to(parent.def) {
                let target = parent.def.column(fk.column)?;
                ormlite_trace_join!(joined.def.declared, parent.def.declared, column.field);
                return Ok(Some(equi_join(slot, column, i, target)));
            }
        }
        for (i, child) in earlier.iter().enumerate() {
            if let Some((column, fk)) = child.def.foreign_key_to(joined.def) {
                let target = joined.def.column(fk.column)?;
                ormlite_trace_join!(child.def.declared, joined.def.declared, column.field);
                return Ok(Some(equi_join(i, column, slot, target)));
            }
        }
        Ok(None)
    }

    /// Like [`infer_condition`](Self::infer_condition), failing when no key links the tables.
    pub fn require_condition(&self, slot: usize) -> Result<Condition> {
        self.infer_condition(slot)?.ok_or_else(|| {
            let to = self
                .tables
                .get(slot)
                .map_or("?", |t| t.def.declared)
                .to_owned();
            OrmLiteError::MissingForeignKey {
                from: self.root().def.declared.to_owned(),
                to,
            }
        })
    }
}

fn equi_join(
    left_slot: usize,
    left: &'static crate::schema::ColumnDef,
    right_slot: usize,
    right: &'static crate::schema::ColumnDef,
) -> Condition {
    Condition::Compare {
        left: Scalar::column(left_slot, left),
        op: CompareOp::Eq,
        right: Scalar::column(right_slot, right),
    }
}
