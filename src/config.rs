use sea_orm::DatabaseBackend;
use serde::{Deserialize, Serialize};

/// SQL dialect the generated search predicates are written for.
///
/// Only the text type used when casting a column for substring search
/// depends on it. It is configuration, never sniffed from a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "postgres", alias = "pg", alias = "postgresql")]
    Postgres,
    #[serde(rename = "mysql", alias = "mysql2")]
    MySql,
    #[serde(rename = "sqlite", alias = "sqlite3")]
    Sqlite,
}

impl Dialect {
    /// Type name used in `CAST(column AS <type>)` before a LIKE match
    #[must_use]
    pub const fn typecast(self) -> &'static str {
        match self {
            Self::Postgres => "VARCHAR",
            Self::MySql => "CHAR",
            Self::Sqlite => "TEXT",
        }
    }
}

impl From<DatabaseBackend> for Dialect {
    fn from(backend: DatabaseBackend) -> Self {
        match backend {
            DatabaseBackend::Postgres => Self::Postgres,
            DatabaseBackend::MySql => Self::MySql,
            DatabaseBackend::Sqlite => Self::Sqlite,
        }
    }
}

/// Engine configuration.
///
/// Deserializes from the application's own config source, for example:
/// ```json
/// {"dialect": "pg"}
/// ```
/// Missing fields fall back to [`GridConfig::default`], which targets Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub dialect: Dialect,
}

impl GridConfig {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Convenience for callers that want the dialect to follow the backend
    /// they already hold, e.g. `GridConfig::for_backend(db.get_database_backend())`.
    #[must_use]
    pub fn for_backend(backend: DatabaseBackend) -> Self {
        Self::new(backend.into())
    }
}
