use std::collections::HashSet;
use std::sync::Arc;

use gossamer_api::storage::{PropertyMap, Storage};
use gossamer_api::{EdgeID, NodeID};

use crate::core::{duplicate_edge_err, Ancestors, Descendants, EdgePredicate, GraphCore};
use crate::entity::{Edge, Node};
use crate::error::Result;

/// A directed multigraph: any number of edges between the same ordered
/// endpoint pair, distinguished by relation-name. Rejects only on exact
/// id collision (§4.7).
#[derive(Debug)]
pub struct MultiGraph<S: Storage> {
    core: GraphCore<S>,
}

impl<S: Storage> MultiGraph<S> {
    pub fn new(storage: Arc<S>) -> Result<Self> {
        Ok(Self {
            core: GraphCore::new(storage)?,
        })
    }

    pub fn storage(&self) -> &Arc<S> {
        self.core.storage()
    }

    pub fn node_ids(&self) -> HashSet<NodeID> {
        self.core.node_ids()
    }

    pub fn edge_ids(&self) -> HashSet<EdgeID> {
        self.core.edge_ids()
    }

    pub fn contains_node(&self, id: &NodeID) -> bool {
        self.core.contains_node(id)
    }

    pub fn contains_edge(&self, id: &EdgeID) -> bool {
        self.core.contains_edge(id)
    }

    pub fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<Node<S>> {
        self.core.add_node(id, props)
    }

    pub fn get_node(&self, id: &NodeID) -> Option<Node<S>> {
        self.core.get_node(id)
    }

    pub fn get_edge(&self, id: &EdgeID) -> Option<Edge<S>> {
        self.core.get_edge(id)
    }

    /// Rejects with [`crate::GraphError::DuplicateEdge`] only on an exact
    /// `(src, dst, relation)` collision.
    pub fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<Edge<S>> {
        if self.core.contains_edge(&id) {
            return Err(duplicate_edge_err(&id));
        }
        self.core.insert_edge(id, props)
    }

    pub fn delete_node(&self, id: &NodeID) -> Result<()> {
        self.core.delete_node(id)
    }

    pub fn delete_edge(&self, id: &EdgeID) -> Result<()> {
        self.core.delete_edge(id)
    }

    pub fn outgoing_edges(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<EdgeID>> {
        self.core.outgoing_edges(id, pred)
    }

    pub fn incoming_edges(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<EdgeID>> {
        self.core.incoming_edges(id, pred)
    }

    pub fn children(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<NodeID>> {
        self.core.children(id, pred)
    }

    pub fn parents(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<NodeID>> {
        self.core.parents(id, pred)
    }

    pub fn descendants<'g>(&'g self, start: &NodeID, pred: EdgePredicate<'g>) -> Descendants<'g, S> {
        self.core.descendants(start, pred)
    }

    pub fn ancestors<'g>(&'g self, start: &NodeID, pred: EdgePredicate<'g>) -> Ancestors<'g, S> {
        self.core.ancestors(start, pred)
    }
}
