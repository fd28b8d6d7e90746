//! SQLite model bootstrap and predicate-to-SQL translation.
//!
//! # Responsibility
//! - Collect entity-to-table mappings and render their DDL.
//! - Open and configure SQLite connections with the mapped tables created.
//! - Translate specifications into parameterized `WHERE` clauses.
//!
//! # Invariants
//! - Table creation runs in one transaction and is idempotent.
//! - Translated SQL keeps the in-memory semantics of each operator.
//! - Running translated queries stays with the caller.

use crate::model::entity::ModelError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod context;
mod model_builder;
mod sql;

pub use context::{DbContext, DbOptions};
pub use model_builder::{ColumnMapping, Model, ModelBuilder, TableMapping};
pub use sql::{quote_identifier, select_sql, to_sql, SqlFragment};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Model(ModelError),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Model(err) => write!(f, "invalid model: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Model(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<ModelError> for DbError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}
