//! `Node`/`Edge` — the concrete [`Entity`] handles a [`crate::SimpleGraph`]/
//! [`crate::MultiGraph`] hands back. Neither carries any property state of
//! its own; every read and write is forwarded straight to the owning
//! storage (§4.2). Equality and hashing are by id alone, as the façade
//! contract requires — two handles for the same id compare equal even if
//! they are not the same instance.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use gossamer_api::storage::{PropertyMap, PropertyPatch, Storage};
use gossamer_api::{EdgeID, Entity, NodeID, Result};

#[derive(Debug)]
pub struct Node<S: Storage> {
    storage: Arc<S>,
    id: NodeID,
}

impl<S: Storage> Node<S> {
    pub(crate) fn new(storage: Arc<S>, id: NodeID) -> Self {
        Self { storage, id }
    }

    pub fn id(&self) -> &NodeID {
        &self.id
    }
}

impl<S: Storage> Clone for Node<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            id: self.id.clone(),
        }
    }
}

impl<S: Storage> PartialEq for Node<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<S: Storage> Eq for Node<S> {}

impl<S: Storage> Hash for Node<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<S: Storage> Entity for Node<S> {
    fn id_display(&self) -> String {
        self.id.to_string()
    }

    fn type_name(&self) -> &'static str {
        "node"
    }

    fn raw_get_all(&self) -> Result<PropertyMap> {
        self.storage.get_node_properties(&self.id)
    }

    fn raw_set_patch(&self, patch: PropertyPatch) -> Result<()> {
        self.storage.set_node_properties(&self.id, patch)
    }
}

#[derive(Debug)]
pub struct Edge<S: Storage> {
    storage: Arc<S>,
    id: EdgeID,
}

impl<S: Storage> Edge<S> {
    pub(crate) fn new(storage: Arc<S>, id: EdgeID) -> Self {
        Self { storage, id }
    }

    pub fn id(&self) -> &EdgeID {
        &self.id
    }
}

impl<S: Storage> Clone for Edge<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            id: self.id.clone(),
        }
    }
}

impl<S: Storage> PartialEq for Edge<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<S: Storage> Eq for Edge<S> {}

impl<S: Storage> Hash for Edge<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<S: Storage> Entity for Edge<S> {
    fn id_display(&self) -> String {
        self.id.to_string()
    }

    fn type_name(&self) -> &'static str {
        "edge"
    }

    fn raw_get_all(&self) -> Result<PropertyMap> {
        self.storage.get_edge_properties(&self.id)
    }

    fn raw_set_patch(&self, patch: PropertyPatch) -> Result<()> {
        self.storage.set_edge_properties(&self.id, patch)
    }
}
