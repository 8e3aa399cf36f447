use std::borrow::Cow;

use ormlite_core::schema::Table;
use ormlite_core::{Config, Query};
use ormlite_types::Dialect;

//------------------------------------------------------------------------------
// OrmLite - Query Factory
//------------------------------------------------------------------------------

/// Entry point holding the dialect and settings every query starts from.
///
/// Cheap to copy; queries never share state with the factory or each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrmLite {
    dialect: Dialect,
    config: Config,
}

impl OrmLite {
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            config: Config::new(),
        }
    }

    pub const fn with_config(dialect: Dialect, config: Config) -> Self {
        Self { dialect, config }
    }

    #[inline]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// A new query rooted at `T`.
    pub fn from<T: Table>(&self) -> Query<T> {
        Query::new(self.dialect, self.config)
    }

    /// A new query rooted at `T`, registered under `alias`.
    pub fn from_as<T: Table>(&self, alias: impl Into<Cow<'static, str>>) -> Query<T> {
        Query::with_alias(self.dialect, self.config, alias)
    }
}

impl Default for OrmLite {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
