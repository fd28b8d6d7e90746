//! Closed set of filter operators.

use crate::model::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Comparison applied between a member and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanEqualTo,
    LessThan,
    LessThanEqualTo,
    /// Ordinal substring test on text members.
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Self::EqualTo,
        Self::NotEqualTo,
        Self::GreaterThan,
        Self::GreaterThanEqualTo,
        Self::LessThan,
        Self::LessThanEqualTo,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EqualTo => "equal_to",
            Self::NotEqualTo => "not_equal_to",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanEqualTo => "greater_than_equal_to",
            Self::LessThan => "less_than",
            Self::LessThanEqualTo => "less_than_equal_to",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }

    /// Infix symbol used when rendering predicates.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::EqualTo => "==",
            Self::NotEqualTo => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqualTo => ">=",
            Self::LessThan => "<",
            Self::LessThanEqualTo => "<=",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Self::EqualTo | Self::NotEqualTo)
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanEqualTo | Self::LessThan | Self::LessThanEqualTo
        )
    }

    pub fn is_text_match(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    /// Whether this operator may be applied to a member of `kind`.
    pub fn supports(self, kind: ValueKind) -> bool {
        if self.is_ordering() {
            kind.supports_ordering()
        } else if self.is_text_match() {
            kind.is_text()
        } else {
            true
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator text outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Accepts snake_case names, PascalCase names and comparison symbols.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let operator = match trimmed {
            "==" | "=" => Self::EqualTo,
            "!=" | "<>" => Self::NotEqualTo,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanEqualTo,
            "<" => Self::LessThan,
            "<=" => Self::LessThanEqualTo,
            other => {
                let normalized = other.replace('_', "").to_ascii_lowercase();
                match normalized.as_str() {
                    "equalto" => Self::EqualTo,
                    "notequalto" => Self::NotEqualTo,
                    "greaterthan" => Self::GreaterThan,
                    "greaterthanequalto" => Self::GreaterThanEqualTo,
                    "lessthan" => Self::LessThan,
                    "lessthanequalto" => Self::LessThanEqualTo,
                    "contains" => Self::Contains,
                    "startswith" => Self::StartsWith,
                    "endswith" => Self::EndsWith,
                    _ => return Err(UnknownOperator(trimmed.to_string())),
                }
            }
        };
        Ok(operator)
    }
}
