//! Typed literals and the coercion rules that turn JSON into them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

/// Date format used for `date` fields, both when parsing and when rendering.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The declared type of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[serde(alias = "int", alias = "long")]
    Integer,
    #[serde(alias = "double", alias = "decimal")]
    Float,
    #[serde(alias = "string")]
    Text,
    #[serde(alias = "bool")]
    Boolean,
    Date,
    #[serde(alias = "datetime", alias = "timestamp")]
    DateTime,
    Uuid,
}

impl ValueType {
    /// Returns the lowercase name used in schemas and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::DateTime => "date_time",
            ValueType::Uuid => "uuid",
        }
    }

    /// Returns true if values of this type have a meaningful ordering for
    /// range operators.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, ValueType::Boolean | ValueType::Uuid)
    }

    /// Coerces a JSON literal to this type.
    ///
    /// Returns `None` when the literal cannot represent a value of this type.
    /// Numeric strings are accepted for numeric types and `"true"`/`"false"`
    /// for booleans, since filters frequently arrive through query strings.
    pub fn coerce(&self, json: &Json) -> Option<Value> {
        match (self, json) {
            (ValueType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
            (ValueType::Integer, Json::String(s)) => s.trim().parse().ok().map(Value::Integer),

            (ValueType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
            (ValueType::Float, Json::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),

            (ValueType::Text, Json::String(s)) => Some(Value::Text(s.clone())),
            (ValueType::Text, Json::Number(n)) => Some(Value::Text(n.to_string())),
            (ValueType::Text, Json::Bool(b)) => Some(Value::Text(b.to_string())),

            (ValueType::Boolean, Json::Bool(b)) => Some(Value::Boolean(*b)),
            (ValueType::Boolean, Json::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },

            (ValueType::Date, Json::String(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .ok()
                .map(Value::Date),

            (ValueType::DateTime, Json::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),

            (ValueType::Uuid, Json::String(s)) => Uuid::parse_str(s.trim()).ok().map(Value::Uuid),

            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" | "long" => Ok(ValueType::Integer),
            "float" | "double" | "decimal" => Ok(ValueType::Float),
            "text" | "string" => Ok(ValueType::Text),
            "boolean" | "bool" => Ok(ValueType::Boolean),
            "date" => Ok(ValueType::Date),
            "date_time" | "datetime" | "timestamp" => Ok(ValueType::DateTime),
            "uuid" => Ok(ValueType::Uuid),
            other => Err(format!("unknown value type: {other}")),
        }
    }
}

/// A typed literal appearing in a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
}

impl Value {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Text(_) => ValueType::Text,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Date(_) => ValueType::Date,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Uuid(_) => ValueType::Uuid,
        }
    }

    /// Renders the value back into the JSON shape the DSL accepts.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Integer(i) => Json::from(*i),
            Value::Float(f) => Json::from(*f),
            Value::Text(s) => Json::String(s.clone()),
            Value::Boolean(b) => Json::Bool(*b),
            Value::Date(d) => Json::String(d.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
            Value::Uuid(u) => Json::String(u.to_string()),
        }
    }

    /// Compares two values of compatible types.
    ///
    /// Integers and floats compare numerically with each other; any other
    /// mix of types is unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Formats the value as an SQL-style literal: text, dates and uuids are
    /// single-quoted with embedded quotes doubled.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "'{}'", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "'{}'", dt.to_rfc3339()),
            Value::Uuid(u) => write!(f, "'{u}'"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}
