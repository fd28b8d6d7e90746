//! Typed member values and untyped caller literals.
//!
//! # Responsibility
//! - Define the closed set of member types the predicate layer understands.
//! - Carry typed values read from entities and coerced from caller input.
//! - Carry untyped caller input until it is coerced against a member.
//!
//! # Invariants
//! - A non-null `Value` always matches exactly one `ValueKind`.
//! - Ordering is only defined between values of the same orderable kind.
//! - Timestamps compare at millisecond precision, the precision they are
//!   stored with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Declared type of an entity member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float. Non-finite values are never produced by coercion.
    Float,
    Text,
    /// UTC instant, persisted as Unix epoch milliseconds.
    Timestamp,
    Uuid,
}

impl ValueKind {
    /// Stable lowercase name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
        }
    }

    /// Whether `<`, `<=`, `>` and `>=` are allowed on members of this kind.
    ///
    /// Only numeric and time kinds; text has no ordering here.
    pub fn supports_ordering(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Timestamp)
    }

    /// Whether substring, prefix and suffix tests are allowed.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed runtime value of an entity member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

impl Value {
    /// Returns the kind of a non-null value.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Text(_) => Some(ValueKind::Text),
            Self::Timestamp(_) => Some(ValueKind::Timestamp),
            Self::Uuid(_) => Some(ValueKind::Uuid),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Orders two values of the same orderable kind.
    ///
    /// Returns `None` for nulls, mismatched kinds and non-orderable kinds.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => Some(left.cmp(right)),
            (Self::Float(left), Self::Float(right)) => left.partial_cmp(right),
            (Self::Timestamp(left), Self::Timestamp(right)) => {
                Some(left.timestamp_millis().cmp(&right.timestamp_millis()))
            }
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Timestamp(left), Self::Timestamp(right)) => {
                left.timestamp_millis() == right.timestamp_millis()
            }
            (Self::Uuid(left), Self::Uuid(right)) => left == right,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            Self::Uuid(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Untyped value supplied by a caller, not yet bound to a member type.
///
/// Deserializes from plain JSON scalars (`null`, `true`, `10`, `1.5`, `"x"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Text(value.to_rfc3339())
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Self::Text(value.to_string())
    }
}

impl<V: Into<Literal>> From<Option<V>> for Literal {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::{Literal, Value, ValueKind};
    use chrono::{Duration, TimeZone, Utc};
    use std::cmp::Ordering;

    #[test]
    fn ordering_is_limited_to_numeric_and_time_kinds() {
        assert!(ValueKind::Int.supports_ordering());
        assert!(ValueKind::Float.supports_ordering());
        assert!(ValueKind::Timestamp.supports_ordering());
        assert!(!ValueKind::Text.supports_ordering());
        assert!(!ValueKind::Bool.supports_ordering());
        assert!(!ValueKind::Uuid.supports_ordering());
    }

    #[test]
    fn compare_rejects_mismatched_kinds_and_nulls() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(Value::Int(1).compare(&Value::Float(2.0)), None);
        assert_eq!(Value::Null.compare(&Value::Int(2)), None);
        assert_eq!(
            Value::Text("a".into()).compare(&Value::Text("b".into())),
            None
        );
    }

    #[test]
    fn optional_values_map_none_to_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
        assert_eq!(Literal::from(None::<i64>), Literal::Null);
    }

    #[test]
    fn timestamps_compare_at_millisecond_precision() {
        let stored = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
        let finer = Value::Timestamp(stored + Duration::microseconds(500));

        assert_eq!(Value::Timestamp(stored), finer);
        assert_eq!(
            Value::Timestamp(stored).compare(&finer),
            Some(Ordering::Equal)
        );
        let later = Value::Timestamp(stored + Duration::milliseconds(1));
        assert_eq!(
            Value::Timestamp(stored).compare(&later),
            Some(Ordering::Less)
        );
    }
}
