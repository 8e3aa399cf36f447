use thiserror::Error;

use ormlite_types::{BitOp, DialectKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrmLiteError {
    /// An expression references a table that was never registered in the query
    #[error("table `{0}` is not part of this query")]
    UnknownTable(String),

    /// A table is registered more than once and the reference carries no alias
    #[error("table `{0}` appears more than once; an explicit alias is required")]
    AmbiguousTable(String),

    /// A field or column name does not exist on the table
    #[error("`{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    /// No predicate was given and no foreign key links the two tables
    #[error("could not infer a join condition between `{from}` and `{to}`; declare a foreign key or pass a predicate")]
    MissingForeignKey { from: String, to: String },

    /// The dialect cannot render this operator
    #[error("operator `{}` is not supported by {dialect}", op.as_str())]
    UnsupportedOperator { op: BitOp, dialect: DialectKind },

    /// The expression has no SQL translation in this position
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A non-boolean expression was used where a predicate is required
    #[error("expression is not a predicate: {0}")]
    NotAPredicate(String),

    /// A caller-named parameter collides with an existing one
    #[error("parameter `{0}` is already defined")]
    DuplicateParam(String),

    /// A parameter handle was used outside the query that registered it
    #[error("parameter #{0} was registered on a different query")]
    ForeignParam(usize),

    /// A raw fragment refers to an argument that was not supplied
    #[error("raw SQL references argument {{{index}}} but only {supplied} were supplied")]
    InvalidRawSql { index: usize, supplied: usize },
}

/// Result type for query building
pub type Result<T> = std::result::Result<T, OrmLiteError>;
