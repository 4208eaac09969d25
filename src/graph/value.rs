use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of evaluating a gateway condition, and the tag a branch is matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

/// How an exclusive gateway compares branch tags with condition results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchMatching {
    /// Boolean-like comparison: `1`, `"1"` and `"true"` match `true`, numeric
    /// strings match numbers of the same value.
    #[default]
    Loose,
    /// Same variant and same value.
    Exact,
}

impl ConditionValue {
    /// `false`, `0`, `""`, `"0"`, `"false"` and null read as false; everything else as true.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConditionValue::Bool(b) => *b,
            ConditionValue::Number(n) => *n != 0.0,
            ConditionValue::Text(s) => {
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            ConditionValue::Null => false,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(n) => Some(*n),
            ConditionValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Compares two values the way a loosely typed schema expects.
    ///
    /// Anything compared with a bool is compared by truthiness. Null equals any
    /// falsy value. Numbers and numeric strings compare by numeric value; other
    /// pairs compare by their text.
    pub fn loosely_equals(&self, other: &ConditionValue) -> bool {
        use ConditionValue::*;
        match (self, other) {
            (Bool(_), _) | (_, Bool(_)) => self.is_truthy() == other.is_truthy(),
            (Null, Null) => true,
            (Null, value) | (value, Null) => !value.is_truthy(),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => self.to_string() == other.to_string(),
            },
        }
    }

    pub fn matches(&self, other: &ConditionValue, mode: BranchMatching) -> bool {
        match mode {
            BranchMatching::Loose => self.loosely_equals(other),
            BranchMatching::Exact => self == other,
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Bool(b) => write!(f, "{}", b),
            ConditionValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ConditionValue::Text(s) => write!(f, "{}", s),
            ConditionValue::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value as f64)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<&serde_json::Value> for ConditionValue {
    fn from(value: &serde_json::Value) -> Self {
        if let Some(b) = value.as_bool() {
            ConditionValue::Bool(b)
        } else if let Some(n) = value.as_f64() {
            ConditionValue::Number(n)
        } else if let Some(s) = value.as_str() {
            ConditionValue::Text(s.to_string())
        } else {
            ConditionValue::Null
        }
    }
}

impl std::str::FromStr for ConditionValue {
    type Err = std::convert::Infallible;

    /// Parses the textual form used on command lines: `true`/`false`, numbers,
    /// `null`, and anything else as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true" => ConditionValue::Bool(true),
            "false" => ConditionValue::Bool(false),
            "null" => ConditionValue::Null,
            other => other
                .parse::<f64>()
                .map(ConditionValue::Number)
                .unwrap_or_else(|_| ConditionValue::Text(other.to_string())),
        })
    }
}
