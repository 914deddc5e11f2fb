//! Shared machinery behind [`crate::SimpleGraph`] and [`crate::MultiGraph`]
//! (§4.7): cached id sets, node/edge CRUD forwarding, and the lazy
//! traversal iterators. Edge-collision policy is the only thing that
//! differs between the two public façades, so it lives there instead of
//! here.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use gossamer_api::storage::{PropertyMap, Storage};
use gossamer_api::{EdgeID, NodeID};

use crate::entity::{Edge, Node};
use crate::error::{GraphError, Result};

/// An optional filter over candidate edges during a traversal. `None`
/// means "every edge passes".
pub type EdgePredicate<'a> = Option<&'a dyn Fn(&EdgeID) -> bool>;

fn passes(pred: EdgePredicate<'_>, id: &EdgeID) -> bool {
    pred.map(|f| f(id)).unwrap_or(true)
}

#[derive(Debug)]
pub struct GraphCore<S: Storage> {
    storage: Arc<S>,
    node_ids: RwLock<HashSet<NodeID>>,
    edge_ids: RwLock<HashSet<EdgeID>>,
}

impl<S: Storage> GraphCore<S> {
    pub(crate) fn new(storage: Arc<S>) -> Result<Self> {
        let node_ids = storage.node_ids()?;
        let edge_ids = storage.edge_ids()?;
        Ok(Self {
            storage,
            node_ids: RwLock::new(node_ids),
            edge_ids: RwLock::new(edge_ids),
        })
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn node_ids(&self) -> HashSet<NodeID> {
        self.node_ids.read().unwrap().clone()
    }

    pub fn edge_ids(&self) -> HashSet<EdgeID> {
        self.edge_ids.read().unwrap().clone()
    }

    pub fn contains_node(&self, id: &NodeID) -> bool {
        self.storage.contains_node(id)
    }

    pub fn contains_edge(&self, id: &EdgeID) -> bool {
        self.storage.contains_edge(id)
    }

    pub fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<Node<S>> {
        self.storage.add_node(id.clone(), props)?;
        self.node_ids.write().unwrap().insert(id.clone());
        Ok(Node::new(Arc::clone(&self.storage), id))
    }

    pub fn get_node(&self, id: &NodeID) -> Option<Node<S>> {
        if self.storage.contains_node(id) {
            Some(Node::new(Arc::clone(&self.storage), id.clone()))
        } else {
            None
        }
    }

    pub fn get_edge(&self, id: &EdgeID) -> Option<Edge<S>> {
        if self.storage.contains_edge(id) {
            Some(Edge::new(Arc::clone(&self.storage), id.clone()))
        } else {
            None
        }
    }

    pub(crate) fn insert_edge(&self, id: EdgeID, props: PropertyMap) -> Result<Edge<S>> {
        self.storage.add_edge(id.clone(), props)?;
        self.edge_ids.write().unwrap().insert(id.clone());
        Ok(Edge::new(Arc::clone(&self.storage), id))
    }

    pub fn delete_node(&self, id: &NodeID) -> Result<()> {
        let touching: HashSet<EdgeID> = self
            .storage
            .incoming_edges(id)
            .unwrap_or_default()
            .union(&self.storage.outgoing_edges(id).unwrap_or_default())
            .cloned()
            .collect();
        self.storage.delete_node(id)?;
        self.node_ids.write().unwrap().remove(id);
        let mut edge_ids = self.edge_ids.write().unwrap();
        for e in touching {
            edge_ids.remove(&e);
        }
        Ok(())
    }

    pub fn delete_edge(&self, id: &EdgeID) -> Result<()> {
        self.storage.delete_edge(id)?;
        self.edge_ids.write().unwrap().remove(id);
        Ok(())
    }

    pub fn outgoing_edges(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<EdgeID>> {
        Ok(self
            .storage
            .outgoing_edges(id)?
            .into_iter()
            .filter(|e| passes(pred, e))
            .collect())
    }

    pub fn incoming_edges(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<EdgeID>> {
        Ok(self
            .storage
            .incoming_edges(id)?
            .into_iter()
            .filter(|e| passes(pred, e))
            .collect())
    }

    pub fn children(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<NodeID>> {
        Ok(self
            .outgoing_edges(id, pred)?
            .into_iter()
            .map(|e| e.dst)
            .collect())
    }

    pub fn parents(&self, id: &NodeID, pred: EdgePredicate<'_>) -> Result<HashSet<NodeID>> {
        Ok(self
            .incoming_edges(id, pred)?
            .into_iter()
            .map(|e| e.src)
            .collect())
    }

    /// Breadth-first, each reachable descendant exactly once (§8 #14).
    pub fn descendants<'g>(&'g self, start: &NodeID, pred: EdgePredicate<'g>) -> Descendants<'g, S> {
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        Descendants {
            graph: self,
            pred,
            visited,
            pending: VecDeque::new(),
            frontier: VecDeque::from([start.clone()]),
        }
    }

    /// Depth-first, each reachable ancestor exactly once.
    pub fn ancestors<'g>(&'g self, start: &NodeID, pred: EdgePredicate<'g>) -> Ancestors<'g, S> {
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        Ancestors {
            graph: self,
            pred,
            start: start.clone(),
            visited,
            frontier: vec![start.clone()],
        }
    }
}

/// Lazy BFS over descendants. Pulling one item does at most one
/// neighbor-expansion's worth of work, never a full traversal.
pub struct Descendants<'g, S: Storage> {
    graph: &'g GraphCore<S>,
    pred: EdgePredicate<'g>,
    visited: HashSet<NodeID>,
    pending: VecDeque<NodeID>,
    frontier: VecDeque<NodeID>,
}

impl<'g, S: Storage> Iterator for Descendants<'g, S> {
    type Item = Result<NodeID>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(n) = self.pending.pop_front() {
                return Some(Ok(n));
            }
            let current = self.frontier.pop_front()?;
            let children = match self.graph.children(&current, self.pred) {
                Ok(c) => c,
                Err(e) => return Some(Err(e)),
            };
            for child in children {
                if self.visited.insert(child.clone()) {
                    self.pending.push_back(child.clone());
                    self.frontier.push_back(child);
                }
            }
        }
    }
}

/// Lazy DFS over ancestors. A single stack drives both expansion and
/// emission: each pop is expanded (its unvisited parents pushed) and then
/// yielded immediately, so the next pop is always the deepest undiscovered
/// ancestor along the branch just opened, not a sibling at the same depth.
pub struct Ancestors<'g, S: Storage> {
    graph: &'g GraphCore<S>,
    pred: EdgePredicate<'g>,
    start: NodeID,
    visited: HashSet<NodeID>,
    frontier: Vec<NodeID>,
}

impl<'g, S: Storage> Iterator for Ancestors<'g, S> {
    type Item = Result<NodeID>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.frontier.pop()?;
            let parents = match self.graph.parents(&current, self.pred) {
                Ok(p) => p,
                Err(e) => return Some(Err(e)),
            };
            for parent in parents {
                if self.visited.insert(parent.clone()) {
                    self.frontier.push(parent);
                }
            }
            if current != self.start {
                return Some(Ok(current));
            }
        }
    }
}

pub(crate) fn duplicate_edge_err(id: &EdgeID) -> GraphError {
    GraphError::DuplicateEdge(id.clone())
}
