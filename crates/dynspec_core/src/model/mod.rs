//! Entity metadata and value model for the predicate layer.
//!
//! # Responsibility
//! - Describe entity shapes (`EntityType`) and their typed members.
//! - Define typed values read from entities and untyped caller literals.
//!
//! # Invariants
//! - Metadata is built once per entity type and never mutated afterwards.
//! - Member values are read only through getters registered with the type.

pub mod entity;
pub mod value;
