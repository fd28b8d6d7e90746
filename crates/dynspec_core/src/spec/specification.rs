//! Composite specifications over predicates.
//!
//! # Invariants
//! - `All([])` is satisfied by every instance; `Any([])` by none.
//! - Combinators flatten nested `All`/`Any` of the same kind.

use super::predicate::Predicate;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Not;

/// Boolean combination of predicates over entity `T`.
pub enum Specification<T> {
    Match(Predicate<T>),
    All(Vec<Specification<T>>),
    Any(Vec<Specification<T>>),
    Not(Box<Specification<T>>),
}

impl<T> Specification<T> {
    /// Specification satisfied by every instance.
    pub fn everything() -> Self {
        Self::All(Vec::new())
    }

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: impl Into<Self>) -> Self {
        let other = other.into();
        match (self, other) {
            (Self::All(mut left), Self::All(right)) => {
                left.extend(right);
                Self::All(left)
            }
            (Self::All(mut left), right) => {
                left.push(right);
                Self::All(left)
            }
            (left, Self::All(mut right)) => {
                right.insert(0, left);
                Self::All(right)
            }
            (left, right) => Self::All(vec![left, right]),
        }
    }

    /// Disjunction of `self` and `other`.
    pub fn or(self, other: impl Into<Self>) -> Self {
        let other = other.into();
        match (self, other) {
            (Self::Any(mut left), Self::Any(right)) => {
                left.extend(right);
                Self::Any(left)
            }
            (Self::Any(mut left), right) => {
                left.push(right);
                Self::Any(left)
            }
            (left, Self::Any(mut right)) => {
                right.insert(0, left);
                Self::Any(right)
            }
            (left, right) => Self::Any(vec![left, right]),
        }
    }

    pub fn is_satisfied_by(&self, instance: &T) -> bool {
        match self {
            Self::Match(predicate) => predicate.evaluate(instance),
            Self::All(parts) => parts.iter().all(|part| part.is_satisfied_by(instance)),
            Self::Any(parts) => parts.iter().any(|part| part.is_satisfied_by(instance)),
            Self::Not(inner) => !inner.is_satisfied_by(instance),
        }
    }

    /// Narrows `items` to the instances satisfying this specification.
    pub fn filter<'a, I>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items
            .into_iter()
            .filter(|item| self.is_satisfied_by(item))
            .collect()
    }

    /// Visits every predicate leaf, depth first.
    pub fn predicates(&self) -> Vec<&Predicate<T>> {
        let mut leaves = Vec::new();
        self.collect_predicates(&mut leaves);
        leaves
    }

    fn collect_predicates<'a>(&'a self, leaves: &mut Vec<&'a Predicate<T>>) {
        match self {
            Self::Match(predicate) => leaves.push(predicate),
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_predicates(leaves);
                }
            }
            Self::Not(inner) => inner.collect_predicates(leaves),
        }
    }
}

impl<T> From<Predicate<T>> for Specification<T> {
    fn from(value: Predicate<T>) -> Self {
        Self::Match(value)
    }
}

impl<T> Not for Specification<T> {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

impl<T> Not for Predicate<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        !Specification::Match(self)
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Match(predicate) => Self::Match(predicate.clone()),
            Self::All(parts) => Self::All(parts.clone()),
            Self::Any(parts) => Self::Any(parts.clone()),
            Self::Not(inner) => Self::Not(inner.clone()),
        }
    }
}

impl<T> PartialEq for Specification<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Match(left), Self::Match(right)) => left == right,
            (Self::All(left), Self::All(right)) | (Self::Any(left), Self::Any(right)) => {
                left == right
            }
            (Self::Not(left), Self::Not(right)) => left == right,
            _ => false,
        }
    }
}

impl<T> Debug for Specification<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match(predicate) => f.debug_tuple("Match").field(predicate).finish(),
            Self::All(parts) => f.debug_tuple("All").field(parts).finish(),
            Self::Any(parts) => f.debug_tuple("Any").field(parts).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl<T> Display for Specification<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match(predicate) => write!(f, "{predicate}"),
            Self::All(parts) => write_joined(f, parts, " && ", "true"),
            Self::Any(parts) => write_joined(f, parts, " || ", "false"),
            Self::Not(inner) => write!(f, "!({inner})"),
        }
    }
}

fn write_joined<T>(
    f: &mut Formatter<'_>,
    parts: &[Specification<T>],
    separator: &str,
    empty: &str,
) -> std::fmt::Result {
    if parts.is_empty() {
        return f.write_str(empty);
    }
    f.write_str("(")?;
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}
