//! Inferred field types and their join.
//!
//! A [`FieldType`] describes every value a field was observed holding across
//! the leaves of a document. Observations are folded with [`combine`], which
//! keeps the type when all observations agree, widens `int` to `float`, and
//! gives up with `mixed` otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic type of a fixture field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Float,
    Bool,
    String,
    #[serde(rename = "array")]
    ArrayOrObject,
    Mixed,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Int,
        FieldType::Float,
        FieldType::Bool,
        FieldType::String,
        FieldType::ArrayOrObject,
        FieldType::Mixed,
    ];

    /// Classify a raw JSON value. `null` carries no type information and
    /// classifies as `Mixed`.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Int,
            Value::Number(_) => FieldType::Float,
            Value::Bool(_) => FieldType::Bool,
            Value::String(_) => FieldType::String,
            Value::Array(_) | Value::Object(_) => FieldType::ArrayOrObject,
            Value::Null => FieldType::Mixed,
        }
    }

    /// The most specific type describing both observations.
    pub fn combine(self, other: FieldType) -> FieldType {
        match (self, other) {
            (a, b) if a == b => a,
            (FieldType::Int, FieldType::Float) | (FieldType::Float, FieldType::Int) => {
                FieldType::Float
            }
            _ => FieldType::Mixed,
        }
    }

    /// Boolean fields get an `is`-prefixed accessor instead of `get`.
    pub fn is_boolean(self) -> bool {
        self == FieldType::Bool
    }

    /// Canonical lowercase name used verbatim in generated stubs.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::ArrayOrObject => "array",
            FieldType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-function form of [`FieldType::classify`].
pub fn classify(value: &Value) -> FieldType {
    FieldType::classify(value)
}

/// Free-function form of [`FieldType::combine`].
pub fn combine(a: FieldType, b: FieldType) -> FieldType {
    a.combine(b)
}
