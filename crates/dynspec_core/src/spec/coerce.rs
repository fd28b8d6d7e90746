//! Conversion of untyped literals to member types.
//!
//! # Invariants
//! - Conversion is total over (`Literal`, `ValueKind`): every pair either
//!   yields a value of exactly that kind or a `TypeConversion` error.
//! - Non-finite floats are never produced.
//! - Timestamps carry at most millisecond precision.

use super::{SpecError, SpecResult};
use crate::model::value::{Literal, Value, ValueKind};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use uuid::Uuid;

/// Converts `literal` to a value of `kind`.
///
/// `Literal::Null` converts to `Value::Null` only when `nullable` is set.
///
/// # Errors
/// - Returns `SpecError::TypeConversion` when no conversion rule applies or
///   the input is out of range for the target type.
pub fn coerce(literal: &Literal, kind: ValueKind, nullable: bool) -> SpecResult<Value> {
    if literal.is_null() {
        return if nullable {
            Ok(Value::Null)
        } else {
            Err(conversion_error(literal, kind))
        };
    }

    let converted = match kind {
        ValueKind::Text => Some(to_text(literal)),
        ValueKind::Int => to_int(literal).map(Value::Int),
        ValueKind::Float => to_float(literal).map(Value::Float),
        ValueKind::Bool => to_bool(literal).map(Value::Bool),
        ValueKind::Timestamp => to_timestamp(literal).map(Value::Timestamp),
        ValueKind::Uuid => to_uuid(literal).map(Value::Uuid),
    };

    converted.ok_or_else(|| conversion_error(literal, kind))
}

fn conversion_error(literal: &Literal, kind: ValueKind) -> SpecError {
    SpecError::TypeConversion {
        value: literal.to_string(),
        target: kind,
    }
}

fn to_text(literal: &Literal) -> Value {
    let text = match literal {
        Literal::Text(value) => value.clone(),
        Literal::Bool(value) => value.to_string(),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => value.to_string(),
        Literal::Null => String::new(),
    };
    Value::Text(text)
}

fn to_int(literal: &Literal) -> Option<i64> {
    match literal {
        Literal::Int(value) => Some(*value),
        Literal::Float(value) => float_to_int(*value),
        Literal::Bool(value) => Some(i64::from(*value)),
        Literal::Text(value) => value.trim().parse::<i64>().ok(),
        Literal::Null => None,
    }
}

// Rounds half to even; rejects NaN, infinities and values outside i64.
fn float_to_int(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round_ties_even();
    // i64::MAX as f64 is 2^63, which is already out of range.
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return None;
    }
    Some(rounded as i64)
}

fn to_float(literal: &Literal) -> Option<f64> {
    let value = match literal {
        Literal::Float(value) => *value,
        Literal::Int(value) => *value as f64,
        Literal::Bool(value) => {
            if *value {
                1.0
            } else {
                0.0
            }
        }
        Literal::Text(value) => value.trim().parse::<f64>().ok()?,
        Literal::Null => return None,
    };
    value.is_finite().then_some(value)
}

fn to_bool(literal: &Literal) -> Option<bool> {
    match literal {
        Literal::Bool(value) => Some(*value),
        Literal::Int(value) => Some(*value != 0),
        Literal::Float(value) => value.is_finite().then_some(*value != 0.0),
        Literal::Text(value) => {
            let trimmed = value.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Some(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        Literal::Null => None,
    }
}

fn to_timestamp(literal: &Literal) -> Option<DateTime<Utc>> {
    match literal {
        Literal::Int(millis) => DateTime::from_timestamp_millis(*millis),
        Literal::Text(value) => {
            let trimmed = value.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
                return Some(parsed.with_timezone(&Utc).trunc_subsecs(3));
            }
            let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
            Some(date.and_hms_opt(0, 0, 0)?.and_utc())
        }
        Literal::Float(_) | Literal::Bool(_) | Literal::Null => None,
    }
}

fn to_uuid(literal: &Literal) -> Option<Uuid> {
    match literal {
        Literal::Text(value) => Uuid::parse_str(value.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::coerce;
    use crate::model::value::{Literal, Value, ValueKind};
    use crate::spec::SpecError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn text_parses_to_numbers() {
        assert_eq!(
            coerce(&Literal::from(" 10 "), ValueKind::Int, false),
            Ok(Value::Int(10))
        );
        assert_eq!(
            coerce(&Literal::from("2.5"), ValueKind::Float, false),
            Ok(Value::Float(2.5))
        );
    }

    #[test]
    fn floats_round_half_to_even_when_narrowed() {
        assert_eq!(
            coerce(&Literal::Float(2.5), ValueKind::Int, false),
            Ok(Value::Int(2))
        );
        assert_eq!(
            coerce(&Literal::Float(3.5), ValueKind::Int, false),
            Ok(Value::Int(4))
        );
        assert!(coerce(&Literal::Float(1e30), ValueKind::Int, false).is_err());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let err = coerce(&Literal::from("NaN"), ValueKind::Float, false).unwrap_err();
        assert_eq!(
            err,
            SpecError::TypeConversion {
                value: "\"NaN\"".to_string(),
                target: ValueKind::Float,
            }
        );
        assert!(coerce(&Literal::Float(f64::INFINITY), ValueKind::Bool, false).is_err());
    }

    #[test]
    fn timestamps_accept_rfc3339_dates_and_epoch_millis() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(
            coerce(&Literal::from("2024-03-01"), ValueKind::Timestamp, false),
            Ok(Value::Timestamp(expected))
        );
        assert_eq!(
            coerce(
                &Literal::from("2024-03-01T02:00:00+02:00"),
                ValueKind::Timestamp,
                false
            ),
            Ok(Value::Timestamp(expected))
        );
        assert_eq!(
            coerce(
                &Literal::Int(expected.timestamp_millis()),
                ValueKind::Timestamp,
                false
            ),
            Ok(Value::Timestamp(expected))
        );
        assert!(coerce(&Literal::Float(1.0), ValueKind::Timestamp, false).is_err());
    }

    #[test]
    fn timestamps_drop_sub_millisecond_digits() {
        let Ok(Value::Timestamp(parsed)) = coerce(
            &Literal::from("2024-01-10T08:30:00.0125Z"),
            ValueKind::Timestamp,
            false,
        ) else {
            panic!("timestamp should parse");
        };
        assert_eq!(parsed.timestamp_subsec_nanos(), 12_000_000);
    }

    #[test]
    fn null_requires_nullable_member() {
        assert_eq!(
            coerce(&Literal::Null, ValueKind::Text, true),
            Ok(Value::Null)
        );
        assert!(coerce(&Literal::Null, ValueKind::Text, false).is_err());
    }

    #[test]
    fn bool_and_uuid_conversions() {
        assert_eq!(
            coerce(&Literal::from("TRUE"), ValueKind::Bool, false),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            coerce(&Literal::Int(0), ValueKind::Bool, false),
            Ok(Value::Bool(false))
        );
        assert!(coerce(&Literal::from("yes"), ValueKind::Bool, false).is_err());
        assert!(coerce(&Literal::Int(1), ValueKind::Uuid, false).is_err());
        assert_eq!(
            coerce(&Literal::Int(15), ValueKind::Text, false),
            Ok(Value::Text("15".to_string()))
        );
    }
}
