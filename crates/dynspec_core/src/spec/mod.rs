//! Dynamic predicate construction and composition.
//!
//! # Responsibility
//! - Turn (member name, operator, untyped value) into a typed `Predicate`.
//! - Compose predicates into specifications evaluated in memory or
//!   translated to SQL by `crate::db`.
//!
//! # Invariants
//! - All input errors surface from `PredicateBuilder::build`, never from
//!   evaluation.
//! - A built `Predicate` is immutable.

use crate::model::value::ValueKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod builder;
pub mod coerce;
pub mod operator;
pub mod predicate;
pub mod specification;

pub use builder::PredicateBuilder;
pub use coerce::coerce;
pub use operator::Operator;
pub use predicate::Predicate;
pub use specification::Specification;

pub type SpecResult<T> = Result<T, SpecError>;

/// Caller-input error raised while building a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// No member with this exact name exists on the entity type.
    MemberNotFound { member: String, entity: String },
    /// The literal cannot be converted to the member's declared type.
    TypeConversion { value: String, target: ValueKind },
    /// The operator does not apply to the member's type, or is unknown.
    UnsupportedOperation {
        operator: String,
        member_type: Option<ValueKind>,
    },
}

impl SpecError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MemberNotFound { .. } => "member_not_found",
            Self::TypeConversion { .. } => "type_conversion",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
        }
    }
}

impl Display for SpecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberNotFound { member, entity } => write!(
                f,
                "cannot find a property or field named `{member}` on type `{entity}`"
            ),
            Self::TypeConversion { value, target } => {
                write!(f, "cannot convert value {value} to type `{target}`")
            }
            Self::UnsupportedOperation {
                operator,
                member_type: Some(kind),
            } => write!(
                f,
                "operator `{operator}` is not supported for members of type `{kind}`"
            ),
            Self::UnsupportedOperation {
                operator,
                member_type: None,
            } => write!(f, "unknown operator `{operator}`"),
        }
    }
}

impl Error for SpecError {}
