//! Table metadata.
//!
//! Tables are described by `'static` [`TableDef`]s, normally generated by the
//! [`table!`](crate::table) macro. The compiler consumes them for
//! field-to-column resolution and for inferring join conditions from foreign
//! keys.

use std::borrow::Cow;

use ormlite_types::{DbType, Naming};

use crate::error::{OrmLiteError, Result};
use crate::join::JoinGraph;

/// Foreign key from one column to a column of another table.
#[derive(Clone, Copy)]
pub struct ForeignKey {
    pub table: fn() -> &'static TableDef,
    /// Field name of the referenced column
    pub column: &'static str,
}

impl core::fmt::Debug for ForeignKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ForeignKey")
            .field("table", &(self.table)().type_name)
            .field("column", &self.column)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    /// Rust field name
    pub field: &'static str,
    /// Explicit column name, bypassing the naming strategy
    pub alias: Option<&'static str>,
    pub ty: DbType,
    pub nullable: bool,
    pub primary_key: bool,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    pub const fn new(field: &'static str, ty: DbType, nullable: bool) -> Self {
        Self {
            field,
            alias: None,
            ty,
            nullable,
            primary_key: false,
            references: None,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Stores the column under `name` instead of the field name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.alias = Some(name);
        self
    }

    pub const fn references(mut self, table: fn() -> &'static TableDef, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }

    /// Column name as it appears in SQL, before quoting.
    pub fn name(&self, naming: Naming) -> Cow<'static, str> {
        match self.alias {
            Some(alias) => Cow::Borrowed(alias),
            None => naming.apply(self.field),
        }
    }

    /// Whether `name` designates this column, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.field.eq_ignore_ascii_case(name)
            || self.alias.is_some_and(|a| a.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
pub struct TableDef {
    /// Fully qualified Rust type path, unique per table type
    pub type_name: &'static str,
    /// Declared name (the Rust type name)
    pub declared: &'static str,
    /// Explicit table name, bypassing the naming strategy
    pub alias: Option<&'static str>,
    pub schema: Option<&'static str>,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub const fn new(
        type_name: &'static str,
        declared: &'static str,
        columns: &'static [ColumnDef],
    ) -> Self {
        Self {
            type_name,
            declared,
            alias: None,
            schema: None,
            columns,
        }
    }

    /// Stores the table under `name` instead of the type name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.alias = Some(name);
        self
    }

    pub const fn schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Table name as it appears in SQL, before quoting.
    pub fn name(&self, naming: Naming) -> Cow<'static, str> {
        match self.alias {
            Some(alias) => Cow::Borrowed(alias),
            None => naming.apply(self.declared),
        }
    }

    /// Whether two definitions describe the same table type.
    #[inline]
    pub fn same_as(&self, other: &TableDef) -> bool {
        core::ptr::eq(self, other) || self.type_name == other.type_name
    }

    /// Exact lookup by field name.
    pub fn column(&self, field: &str) -> Result<&'static ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .ok_or_else(|| OrmLiteError::UnknownColumn {
                table: self.declared.to_owned(),
                column: field.to_owned(),
            })
    }

    /// Case-insensitive lookup by field or column name.
    pub fn find_column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.matches(name))
    }

    pub fn primary_key(&self) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// First column of `self` holding a foreign key into `target`.
    pub fn foreign_key_to(&self, target: &TableDef) -> Option<(&'static ColumnDef, ForeignKey)> {
        self.columns.iter().find_map(|c| {
            c.references
                .filter(|fk| (fk.table)().same_as(target))
                .map(|fk| (c, fk))
        })
    }

    /// Whether `name` designates this table, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.declared.eq_ignore_ascii_case(name)
            || self.alias.is_some_and(|a| a.eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// Slots and references
// =============================================================================

/// How a column handle finds its table inside a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Position in the query's join graph
    Bound(usize),
    /// The only registration of the table type
    Any,
    /// The registration carrying this alias
    Alias(&'static str),
}

/// Symbolic reference to one column of one table registration.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef {
    pub slot: Slot,
    pub table: &'static TableDef,
    pub field: &'static str,
}

impl ColumnRef {
    pub const fn new(slot: Slot, table: &'static TableDef, field: &'static str) -> Self {
        Self { slot, table, field }
    }
}

/// Symbolic reference to a whole table registration.
#[derive(Debug, Clone, Copy)]
pub struct RowRef {
    pub slot: Slot,
    pub table: &'static TableDef,
}

impl RowRef {
    pub const fn new(slot: Slot, table: &'static TableDef) -> Self {
        Self { slot, table }
    }
}

// =============================================================================
// Traits
// =============================================================================

/// A mapped table type.
pub trait Table: 'static {
    /// Struct of typed column handles
    type Columns: Columns;

    fn def() -> &'static TableDef;

    /// Column handles bound to `slot`.
    fn columns(slot: Slot) -> Self::Columns;
}

/// A struct of column handles for one table registration.
pub trait Columns: Copy {
    fn row(&self) -> RowRef;
}

/// One or more tables whose column handles a closure receives.
///
/// Implemented for every [`Table`] by the `table!` macro and for tuples of
/// up to four sources here.
pub trait Source {
    type Columns: Copy;

    fn resolve(graph: &JoinGraph) -> Result<Self::Columns>;
}

macro_rules! impl_source_tuple {
    ($($name:ident),+) => {
        impl<$($name: Source),+> Source for ($($name,)+) {
            type Columns = ($($name::Columns,)+);

            fn resolve(graph: &JoinGraph) -> Result<Self::Columns> {
                Ok(($($name::resolve(graph)?,)+))
            }
        }
    };
}

impl_source_tuple!(A, B);
impl_source_tuple!(A, B, C);
impl_source_tuple!(A, B, C, D);

/// Resolves a single table type against a graph.
pub fn resolve_table<T: Table>(graph: &JoinGraph) -> Result<T::Columns> {
    let slot = graph.slot_of(T::def(), None)?;
    Ok(T::columns(Slot::Bound(slot)))
}
