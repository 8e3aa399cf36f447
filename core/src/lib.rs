//! OrmLite Core
//!
//! Compiles typed query expressions into parameterized SQL for one of
//! several dialects. A [`Query<T>`] collects clauses from closures over
//! typed column handles; each closure is walked into a resolved condition
//! or value as soon as it is passed, and the [`render`] module serializes
//! the result into a [`Statement`].

pub mod condition;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod join;
mod macros;
pub mod param;
pub mod query;
pub mod render;
pub mod schema;
pub mod sql;
mod tracing;
pub mod types;
pub mod walker;

#[doc(hidden)]
pub use paste;

pub use ormlite_types;

pub use config::{Config, EnumEncoding};
pub use error::{OrmLiteError, Result};
pub use join::{Join, JoinKind};
pub use param::{Param, ParamBinder, ParamRef};
pub use query::{IntoSubquery, Query, QueryState, RawArg};
pub use render::Statement;
pub use schema::{Columns, Source, Table, TableDef};
pub use sql::{SQL, SQLChunk};
