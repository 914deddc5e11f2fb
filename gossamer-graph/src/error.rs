use gossamer_api::error::StorageError;
use gossamer_api::ids::EdgeID;
use thiserror::Error;

/// Errors raised by the graph façade. Wraps every [`StorageError`] the
/// underlying storage can raise, plus the Simple-graph edge-collision
/// rule (§4.7) that has no storage-level equivalent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("an edge already connects {0}'s endpoints in this simple graph")]
    DuplicateEdge(EdgeID),
}

pub type Result<T> = std::result::Result<T, GraphError>;
