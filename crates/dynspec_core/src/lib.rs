//! Dynamic filter specifications over SQLite-mapped entities.
//! Predicates are built from (member, operator, value) at runtime and can be
//! evaluated in memory or translated to SQL.

pub mod db;
pub mod logging;
pub mod model;
pub mod spec;

pub use db::{DbContext, DbError, DbOptions, DbResult, Model, ModelBuilder, SqlFragment};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::entity::{Entity, EntityType, MemberDescriptor, ModelError, Visibility};
pub use model::value::{Literal, Value, ValueKind};
pub use spec::{Operator, Predicate, PredicateBuilder, SpecError, SpecResult, Specification};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
