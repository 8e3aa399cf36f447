//! # OrmLite
//!
//! A typed, dialect-aware compiler from query expressions to parameterized
//! SQL.
//!
//! ```rust
//! use ormlite::prelude::*;
//!
//! table! {
//!     pub struct Person {
//!         #[primary_key]
//!         pub id: i64,
//!         pub first_name: String,
//!         pub age: i32,
//!     }
//! }
//!
//! # fn main() -> ormlite::Result<()> {
//! let db = OrmLite::new(Dialect::sqlite());
//! let stmt = db
//!     .from::<Person>()
//!     .r#where(|p| gt(p.age, 40))?
//!     .order_by(|p| p.first_name)?
//!     .limit(0, 10)
//!     .to_select_statement();
//!
//! assert_eq!(
//!     stmt.sql,
//!     r#"SELECT "id", "first_name", "age" FROM "Person" WHERE "age" > @0 ORDER BY "first_name" LIMIT 10"#
//! );
//! assert_eq!(stmt.params.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Dialects
//!
//! | Dialect    | Placeholders | Paging                     |
//! |------------|--------------|----------------------------|
//! | SQLite     | `@name`      | `LIMIT .. OFFSET ..`       |
//! | PostgreSQL | `$n`         | `LIMIT .. OFFSET ..`       |
//! | MySQL      | `?`          | `LIMIT .. OFFSET ..`       |
//! | SQL Server | `@name`      | `OFFSET .. FETCH NEXT ..`  |
//! | Oracle     | `:name`      | nested `ROWNUM` filter     |

mod ormlite;

pub use ormlite::OrmLite;

/// Result type for compiler operations
pub use ormlite_core::Result;

/// Error types
pub mod error {
    pub use ormlite_core::error::OrmLiteError;
}

/// Dialect descriptors and SQL values.
pub use ormlite_types::{
    BitOp, DbType, Dialect, DialectKind, Naming, Paging, PlaceholderStyle, Value,
};

pub use ormlite_core::{
    Config, EnumEncoding, IntoSubquery, Join, JoinKind, Param, ParamRef, Query, QueryState,
    RawArg, Statement, sql_enum, table,
};

/// Core building blocks: metadata, expressions and the compiler stages.
pub mod core {
    pub use ormlite_core::{condition, eval, expr, join, param, query, render, schema, sql, types};
}

/// Everything needed to declare tables and build queries.
///
/// ```rust
/// use ormlite::prelude::*;
/// ```
pub mod prelude {
    pub use crate::OrmLite;
    pub use ormlite_core::expr::*;
    pub use ormlite_core::schema::{Columns, Source, Table};
    pub use ormlite_core::{
        Config, EnumEncoding, Join, JoinKind, Query, RawArg, Statement, sql_enum, table,
    };
    pub use ormlite_types::{Dialect, DialectKind, Naming, Value};
}
