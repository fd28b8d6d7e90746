//! Immutable single-member predicate.
//!
//! # Responsibility
//! - Hold the resolved member, operator and coerced value as inspectable data.
//! - Evaluate against entity instances in memory.
//!
//! # Invariants
//! - `value` is `Value::Null` or of kind `kind`.
//! - `Value::Null` only appears with equality operators.
//! - Evaluation is pure and never fails.

use super::builder::PredicateBuilder;
use super::operator::Operator;
use super::SpecResult;
use crate::model::entity::{Entity, Getter};
use crate::model::value::{Literal, Value, ValueKind};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Boolean condition `instance.member <operator> value` over entity `T`.
pub struct Predicate<T> {
    pub(crate) entity: String,
    pub(crate) member: String,
    pub(crate) column: String,
    pub(crate) kind: ValueKind,
    pub(crate) nullable: bool,
    pub(crate) operator: Operator,
    pub(crate) value: Value,
    pub(crate) getter: Getter<T>,
}

impl<T: Entity> Predicate<T> {
    /// Builds a predicate against the registered metadata of `T`.
    ///
    /// Shorthand for `PredicateBuilder::new(..).build(T::entity_type())`.
    pub fn build(
        member: impl Into<String>,
        operator: Operator,
        value: impl Into<Literal>,
    ) -> SpecResult<Self> {
        PredicateBuilder::new(member, operator, value).build(T::entity_type())
    }
}

impl<T> Predicate<T> {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    /// Storage column of the member.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Coerced comparison value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Applies the predicate to one instance.
    pub fn evaluate(&self, instance: &T) -> bool {
        let actual = (self.getter)(instance);
        match self.operator {
            Operator::EqualTo => actual == self.value,
            Operator::NotEqualTo => actual != self.value,
            Operator::GreaterThan => actual.compare(&self.value) == Some(Ordering::Greater),
            Operator::GreaterThanEqualTo => matches!(
                actual.compare(&self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::LessThan => actual.compare(&self.value) == Some(Ordering::Less),
            Operator::LessThanEqualTo => matches!(
                actual.compare(&self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Contains => text_match(&actual, &self.value, |hay, needle| {
                hay.contains(needle)
            }),
            Operator::StartsWith => text_match(&actual, &self.value, |hay, needle| {
                hay.starts_with(needle)
            }),
            Operator::EndsWith => text_match(&actual, &self.value, |hay, needle| {
                hay.ends_with(needle)
            }),
        }
    }
}

fn text_match(actual: &Value, expected: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    match (actual.as_text(), expected.as_text()) {
        (Some(hay), Some(needle)) => test(hay, needle),
        _ => false,
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            member: self.member.clone(),
            column: self.column.clone(),
            kind: self.kind,
            nullable: self.nullable,
            operator: self.operator,
            value: self.value.clone(),
            getter: self.getter,
        }
    }
}

// The getter is derived from (entity, member), so it is left out.
impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
            && self.member == other.member
            && self.column == other.column
            && self.kind == other.kind
            && self.nullable == other.nullable
            && self.operator == other.operator
            && self.value == other.value
    }
}

impl<T> Debug for Predicate<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("entity", &self.entity)
            .field("member", &self.member)
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("operator", &self.operator)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Renders as a member expression, e.g. `o.Price >= 10`.
impl<T> Display for Predicate<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "o.{} {} {}",
            self.member,
            self.operator.symbol(),
            self.value
        )
    }
}
