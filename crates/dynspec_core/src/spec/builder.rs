//! Per-request predicate builder.
//!
//! # Responsibility
//! - Resolve a member by name on registered entity metadata.
//! - Coerce the caller's literal to the member type.
//! - Check operator/type compatibility and assemble the `Predicate`.
//!
//! # Invariants
//! - Steps run in the order resolve, coerce, check; the first failure wins.
//! - `build` consumes the builder and yields exactly one result.

use super::coerce::coerce;
use super::operator::Operator;
use super::predicate::Predicate;
use super::{SpecError, SpecResult};
use crate::model::entity::EntityType;
use crate::model::value::{Literal, Value};
use log::debug;

/// Inputs of one filter request, consumed by [`build`](Self::build).
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateBuilder {
    member: String,
    operator: Result<Operator, String>,
    value: Literal,
}

impl PredicateBuilder {
    pub fn new(member: impl Into<String>, operator: Operator, value: impl Into<Literal>) -> Self {
        Self {
            member: member.into(),
            operator: Ok(operator),
            value: value.into(),
        }
    }

    /// Creates a builder from operator text (name or symbol).
    ///
    /// Unknown operator text is reported by `build` as
    /// `SpecError::UnsupportedOperation` with no member type.
    pub fn parse(member: impl Into<String>, operator: &str, value: impl Into<Literal>) -> Self {
        Self {
            member: member.into(),
            operator: operator.parse::<Operator>().map_err(|err| err.0),
            value: value.into(),
        }
    }

    /// Builds the predicate against `entity`.
    ///
    /// # Errors
    /// - `MemberNotFound` when no member has the requested name.
    /// - `TypeConversion` when the literal cannot become the member type.
    /// - `UnsupportedOperation` when the operator is unknown or does not
    ///   apply to the member type, or a null value is used with a
    ///   non-equality operator.
    pub fn build<T>(self, entity: &EntityType<T>) -> SpecResult<Predicate<T>> {
        let result = self.assemble(entity);
        match &result {
            Ok(predicate) => debug!(
                "event=predicate_build module=spec status=ok entity={} member={} op={} kind={}",
                entity.name(),
                predicate.member(),
                predicate.operator(),
                predicate.kind()
            ),
            Err(err) => debug!(
                "event=predicate_build module=spec status=error entity={} error_code={} error={}",
                entity.name(),
                err.code(),
                err
            ),
        }
        result
    }

    fn assemble<T>(self, entity: &EntityType<T>) -> SpecResult<Predicate<T>> {
        let descriptor = entity
            .member(&self.member)
            .ok_or_else(|| SpecError::MemberNotFound {
                member: self.member.clone(),
                entity: entity.name().to_string(),
            })?;

        let kind = descriptor.kind();
        let value = coerce(&self.value, kind, descriptor.is_nullable())?;

        let operator = self
            .operator
            .map_err(|operator| SpecError::UnsupportedOperation {
                operator,
                member_type: None,
            })?;

        let null_misuse = matches!(value, Value::Null) && !operator.is_equality();
        if !operator.supports(kind) || null_misuse {
            return Err(SpecError::UnsupportedOperation {
                operator: operator.as_str().to_string(),
                member_type: Some(kind),
            });
        }

        Ok(Predicate {
            entity: entity.name().to_string(),
            member: descriptor.name().to_string(),
            column: descriptor.column().to_string(),
            kind,
            nullable: descriptor.is_nullable(),
            operator,
            value,
            getter: descriptor.getter(),
        })
    }
}
