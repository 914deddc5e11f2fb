use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// An opaque node identifier. Equality and hashing are by `name` alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeID {
    name: String,
}

impl NodeID {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialized form: a string value equal to `name`.
    pub fn serialize(&self) -> Value {
        Value::String(self.name.clone())
    }

    /// Inverse of [`NodeID::serialize`].
    pub fn parse(value: &Value) -> Result<Self, IdParseError> {
        match value {
            Value::String(name) => Ok(NodeID::new(name.clone())),
            other => Err(IdParseError::WrongShape {
                expected: "string",
                got: other.clone(),
            }),
        }
    }
}

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for NodeID {
    fn from(name: &str) -> Self {
        NodeID::new(name)
    }
}

impl From<String> for NodeID {
    fn from(name: String) -> Self {
        NodeID::new(name)
    }
}

/// `(src, dst, relation)` triple. Equality is component-wise; `relation`
/// may be empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeID {
    pub src: NodeID,
    pub dst: NodeID,
    pub relation: String,
}

impl EdgeID {
    pub fn new(src: NodeID, dst: NodeID, relation: impl Into<String>) -> Self {
        Self {
            src,
            dst,
            relation: relation.into(),
        }
    }

    /// Serialized form: `[src.serialize(), dst.serialize(), relation]`.
    pub fn serialize(&self) -> Value {
        Value::List(vec![
            self.src.serialize(),
            self.dst.serialize(),
            Value::String(self.relation.clone()),
        ])
    }

    /// Inverse of [`EdgeID::serialize`]; validates arity 3 and element
    /// kinds `(string, string, string)`.
    pub fn parse(value: &Value) -> Result<Self, IdParseError> {
        let items = match value {
            Value::List(items) => items,
            other => {
                return Err(IdParseError::WrongShape {
                    expected: "list",
                    got: other.clone(),
                });
            }
        };
        if items.len() != 3 {
            return Err(IdParseError::WrongArity {
                expected: 3,
                got: items.len(),
            });
        }
        let src = NodeID::parse(&items[0])?;
        let dst = NodeID::parse(&items[1])?;
        let relation = match &items[2] {
            Value::String(r) => r.clone(),
            other => {
                return Err(IdParseError::WrongShape {
                    expected: "string",
                    got: other.clone(),
                });
            }
        };
        Ok(EdgeID::new(src, dst, relation))
    }
}

impl fmt::Display for EdgeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.src, self.relation, self.dst)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdParseError {
    #[error("expected a {expected} value, got {got:?}")]
    WrongShape { expected: &'static str, got: Value },
    #[error("expected {expected} elements, got {got}")]
    WrongArity { expected: usize, got: usize },
}
