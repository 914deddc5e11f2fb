//! # Gossamer
//!
//! An embeddable property-graph storage engine.
//!
//! ## Quickstart
//!
//! ```
//! use gossamer::{NativeStorage, NodeID, EdgeID, SimpleGraph, PropertyMap, Value};
//! use std::sync::Arc;
//!
//! # fn main() -> gossamer::Result<()> {
//! let graph = SimpleGraph::new(Arc::new(NativeStorage::new()))?;
//! graph.add_node(NodeID::new("alice"), PropertyMap::new())?;
//! graph.add_node(NodeID::new("bob"), PropertyMap::new())?;
//! graph.add_edge(
//!     EdgeID::new(NodeID::new("alice"), NodeID::new("bob"), "knows"),
//!     PropertyMap::new(),
//! )?;
//! assert_eq!(graph.node_ids().len(), 2);
//! # let _ = Value::Null;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core concepts
//!
//! - [`Storage`]: the contract every backend implements — [`NativeStorage`]
//!   (single-threaded), [`ConcurrentStorage`] (multi-reader/single-writer),
//!   [`DeltaStorage`] (a mutable overlay over a shared immutable base).
//! - [`SimpleGraph`]/[`MultiGraph`]: directed-graph façades over any
//!   `Storage`, with cached id sets and lazy traversals.
//! - [`Entity`]: the property-access contract shared by [`Node`]/[`Edge`]
//!   handles and by [`PropertyBinding`]/[`EnumBinding`].

mod error;

pub use error::{Error, Result};

pub use gossamer_api::{
    derived_property_name, Entity, EnumBinding, FromValueVariant, IdParseError,
    NullablePropertyBinding, PropertyBinding, PropertyEnum, PropertyMap, PropertyPatch,
    StorageError, Value, RESERVED_PREFIX,
};
pub use gossamer_api::{EdgeID, NodeID, Storage};
pub use gossamer_graph::{Ancestors, Descendants, Edge, EdgePredicate, GraphError, MultiGraph, Node, SimpleGraph};
pub use gossamer_storage::{ConcurrentStorage, DeltaStorage, NativeStorage, TOMBSTONE_SENTINEL};
