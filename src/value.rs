// Cell values and the coercions every analysis step shares

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of an uploaded dataset.
///
/// Serializes untagged, so a record round-trips as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Absent keys, `Null` and the empty string all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to read the value as a finite number.
    ///
    /// Booleans coerce to 1/0, text is trimmed and parsed. Missing values,
    /// unparseable text and non-finite results give `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.is_finite().then_some(*n),
            Value::Text(s) => parse_number(s),
        }
    }

    /// Numeric coercion with missing and unparseable values read as zero.
    pub fn as_number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// The string form used for grouping keys, category labels and `contains`.
    pub fn to_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Parse trimmed text as a finite number.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
