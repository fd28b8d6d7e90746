//! Specification-to-SQL translation for SQLite.
//!
//! # Invariants
//! - Values are always bound as parameters, never inlined.
//! - Every leaf clause is two-valued (never SQL `NULL`), so `NOT` and
//!   `OR` agree with in-memory evaluation on nullable columns.
//! - Text operators are case-sensitive, matching `str` semantics.

use crate::model::entity::EntityType;
use crate::model::value::Value;
use crate::spec::{Operator, Predicate, Specification};
use log::debug;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, ParamsFromIter, ToSql};

/// SQL text with positional (`?`) parameters in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    /// Parameters ready for `Statement::query` and friends.
    pub fn bind(&self) -> ParamsFromIter<std::slice::Iter<'_, Value>> {
        params_from_iter(self.params.iter())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self {
            Self::Null => ToSqlOutput::Owned(SqlValue::Null),
            Self::Bool(value) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*value))),
            Self::Int(value) => ToSqlOutput::Owned(SqlValue::Integer(*value)),
            Self::Float(value) => ToSqlOutput::Owned(SqlValue::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Self::Timestamp(value) => {
                ToSqlOutput::Owned(SqlValue::Integer(value.timestamp_millis()))
            }
            Self::Uuid(value) => ToSqlOutput::Owned(SqlValue::Text(value.to_string())),
        };
        Ok(output)
    }
}

/// Quotes an identifier for SQLite, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Translates a specification into a `WHERE` condition.
pub fn to_sql<T>(spec: &Specification<T>) -> SqlFragment {
    let mut params = Vec::new();
    let sql = write_spec(spec, &mut params);
    debug!(
        "event=sql_translate module=db status=ok params={}",
        params.len()
    );
    SqlFragment { sql, params }
}

/// Renders `SELECT <columns> FROM <table> WHERE <spec>` for `entity`.
pub fn select_sql<T>(entity: &EntityType<T>, spec: &Specification<T>) -> SqlFragment {
    let columns: Vec<String> = entity
        .members()
        .iter()
        .map(|member| quote_identifier(member.column()))
        .collect();
    let condition = to_sql(spec);
    SqlFragment {
        sql: format!(
            "SELECT {} FROM {} WHERE {}",
            columns.join(", "),
            quote_identifier(entity.table()),
            condition.sql
        ),
        params: condition.params,
    }
}

fn write_spec<T>(spec: &Specification<T>, params: &mut Vec<Value>) -> String {
    match spec {
        Specification::Match(predicate) => write_predicate(predicate, params),
        Specification::All(parts) => write_group(parts, " AND ", "1 = 1", params),
        Specification::Any(parts) => write_group(parts, " OR ", "1 = 0", params),
        Specification::Not(inner) => format!("NOT ({})", write_spec(inner, params)),
    }
}

fn write_group<T>(
    parts: &[Specification<T>],
    separator: &str,
    empty: &str,
    params: &mut Vec<Value>,
) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered: Vec<String> = parts
        .iter()
        .map(|part| format!("({})", write_spec(part, params)))
        .collect();
    rendered.join(separator)
}

fn write_predicate<T>(predicate: &Predicate<T>, params: &mut Vec<Value>) -> String {
    let column = quote_identifier(predicate.column());
    let value = predicate.value();

    match predicate.operator() {
        Operator::EqualTo if value.is_null() => return format!("{column} IS NULL"),
        Operator::NotEqualTo if value.is_null() => return format!("{column} IS NOT NULL"),
        Operator::NotEqualTo if predicate.is_nullable() => {
            params.push(value.clone());
            return format!("({column} IS NULL OR {column} <> ?)");
        }
        _ => {}
    }

    let condition = match predicate.operator() {
        Operator::EqualTo => comparison(&column, "=", value, params),
        Operator::NotEqualTo => comparison(&column, "<>", value, params),
        Operator::GreaterThan => comparison(&column, ">", value, params),
        Operator::GreaterThanEqualTo => comparison(&column, ">=", value, params),
        Operator::LessThan => comparison(&column, "<", value, params),
        Operator::LessThanEqualTo => comparison(&column, "<=", value, params),
        Operator::Contains | Operator::StartsWith | Operator::EndsWith
            if value.as_text() == Some("") =>
        {
            return format!("{column} IS NOT NULL");
        }
        Operator::Contains => {
            params.push(value.clone());
            format!("instr({column}, ?) > 0")
        }
        Operator::StartsWith => {
            params.push(value.clone());
            params.push(value.clone());
            format!("substr({column}, 1, length(?)) = ?")
        }
        Operator::EndsWith => {
            params.push(value.clone());
            params.push(value.clone());
            format!("substr({column}, -length(?)) = ?")
        }
    };

    if predicate.is_nullable() {
        format!("({column} IS NOT NULL AND {condition})")
    } else {
        condition
    }
}

fn comparison(column: &str, symbol: &str, value: &Value, params: &mut Vec<Value>) -> String {
    params.push(value.clone());
    format!("{column} {symbol} ?")
}

#[cfg(test)]
mod tests {
    use super::{quote_identifier, to_sql};
    use crate::model::entity::EntityType;
    use crate::model::value::{Value, ValueKind};
    use crate::spec::{Operator, PredicateBuilder, Specification};

    struct Item {
        price: f64,
        note: Option<String>,
    }

    fn item_type() -> EntityType<Item> {
        EntityType::<Item>::builder("Item", "items")
            .member("Price", ValueKind::Float, |item| item.price.into())
            .member("Note", ValueKind::Text, |item| Value::from(item.note.clone()))
            .nullable()
            .build()
    }

    fn spec(member: &str, operator: Operator, value: &str) -> Specification<Item> {
        PredicateBuilder::new(member, operator, value)
            .build(&item_type())
            .expect("predicate should build")
            .into()
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("price"), "\"price\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn binds_values_in_order() {
        let filter = to_sql(
            &spec("Price", Operator::GreaterThanEqualTo, "10")
                .and(spec("Note", Operator::StartsWith, "ab")),
        );
        assert_eq!(
            filter.sql,
            "(\"price\" >= ?) AND ((\"note\" IS NOT NULL AND substr(\"note\", 1, length(?)) = ?))"
        );
        assert_eq!(
            filter.params,
            vec![
                Value::Float(10.0),
                Value::Text("ab".to_string()),
                Value::Text("ab".to_string()),
            ]
        );
    }

    #[test]
    fn null_literals_become_is_null_checks() {
        let filter = to_sql(&spec("Note", Operator::EqualTo, "x").or(Specification::from(
            PredicateBuilder::new("Note", Operator::NotEqualTo, None::<String>)
                .build(&item_type())
                .expect("null inequality should build"),
        )));
        assert_eq!(
            filter.sql,
            "((\"note\" IS NOT NULL AND \"note\" = ?)) OR (\"note\" IS NOT NULL)"
        );
    }

    #[test]
    fn empty_groups_are_constant() {
        assert_eq!(to_sql(&Specification::<Item>::everything()).sql, "1 = 1");
        assert_eq!(to_sql(&Specification::<Item>::Any(Vec::new())).sql, "1 = 0");
    }
}
