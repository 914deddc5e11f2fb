use thiserror::Error;

use crate::ids::{EdgeID, NodeID};

pub type Result<T> = std::result::Result<T, StorageError>;

/// The closed error taxonomy surfaced uniformly by every [`crate::Storage`]
/// implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage is closed")]
    AccessClosedStorage,

    #[error("node already exists: {0}")]
    NodeAlreadyExist(NodeID),

    #[error("edge already exists: {0}")]
    EdgeAlreadyExist(EdgeID),

    #[error("node does not exist: {0}")]
    NodeNotExist(NodeID),

    #[error("edge does not exist: {0}")]
    EdgeNotExist(EdgeID),

    #[error("invalid property name `{name}` on {id}: names starting with `meta_` are reserved")]
    InvalidPropName { name: String, id: String },
}
