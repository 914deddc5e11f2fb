use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A property value flowing through storage without interpretation.
///
/// `Value` is a closed sum over the variants a node/edge/metadata entry
/// can hold. Equality and hashing are by tag and structural contents —
/// two `List`s or `Set`s are equal iff their elements are, in the order
/// that matters for each (order-sensitive for `List`, order-insensitive
/// for `Set`, which is why it is backed by a `BTreeSet` rather than a
/// `Vec`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    String(String),
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    List(Vec<Value>),
    Set(BTreeSet<Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn float(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.0),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

/// Extracts one `Value` variant's payload, or `None` on any mismatch.
/// Backs the entity façade's typed accessors (§4.2): a type-mismatch is
/// never an error, only an absence.
pub trait FromValueVariant: Sized {
    fn from_value_variant(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
}

impl FromValueVariant for String {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FromValueVariant for i64 {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_int()
    }
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl FromValueVariant for f64 {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_float()
    }
    fn into_value(self) -> Value {
        Value::float(self)
    }
}

impl FromValueVariant for bool {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_bool()
    }
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValueVariant for Vec<Value> {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_list().map(|s| s.to_vec())
    }
    fn into_value(self) -> Value {
        Value::List(self)
    }
}

impl FromValueVariant for BTreeSet<Value> {
    fn from_value_variant(value: &Value) -> Option<Self> {
        value.as_set().cloned()
    }
    fn into_value(self) -> Value {
        Value::Set(self)
    }
}
