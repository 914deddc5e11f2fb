use std::collections::HashSet;
use std::sync::Arc;

use gossamer_api::storage::{PropertyMap, Storage};
use gossamer_api::{EdgeID, NodeID};

use crate::core::{duplicate_edge_err, Ancestors, Descendants, EdgePredicate, GraphCore};
use crate::entity::{Edge, Node};
use crate::error::Result;

/// A directed graph with at most one edge per ordered `(src, dst)` pair,
/// regardless of relation-name (§4.7).
#[derive(Debug)]
pub struct SimpleGraph<S: Storage> {
    core: GraphCore<S>,
}

impl<S: Storage> SimpleGraph<S> {
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

    /// Rejects with [`crate::GraphError::DuplicateEdge`] if any edge
    /// already connects `id.src -> id.dst`, independent of relation-name.
    pub fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<Edge<S>> {
        let collides = self
            .core
            .storage()
            .outgoing_edges(&id.src)
            .map(|edges| edges.iter().any(|e| e.dst == id.dst))
            .unwrap_or(false);
        if collides {
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

#[cfg(test)]
mod tests {
    use super::*;
    use gossamer_storage::NativeStorage;

    fn n(name: &str) -> NodeID {
        NodeID::new(name)
    }

    fn graph() -> SimpleGraph<NativeStorage> {
        SimpleGraph::new(Arc::new(NativeStorage::new())).unwrap()
    }

    #[test]
    fn rejects_second_edge_between_same_endpoints_regardless_of_relation() {
        let g = graph();
        g.add_node(n("a"), PropertyMap::new()).unwrap();
        g.add_node(n("b"), PropertyMap::new()).unwrap();
        g.add_edge(EdgeID::new(n("a"), n("b"), "knows"), PropertyMap::new())
            .unwrap();
        let err = g
            .add_edge(EdgeID::new(n("a"), n("b"), "likes"), PropertyMap::new())
            .unwrap_err();
        assert!(matches!(err, crate::error::GraphError::DuplicateEdge(_)));
    }

    #[test]
    fn get_descendants_visits_each_node_once_in_bfs_order() {
        let g = graph();
        for name in ["a", "b", "c", "d"] {
            g.add_node(n(name), PropertyMap::new()).unwrap();
        }
        g.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("a"), n("c"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("b"), n("d"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("c"), n("d"), "r"), PropertyMap::new())
            .unwrap();

        let descendants: Vec<NodeID> = g.descendants(&n("a"), None).map(Result::unwrap).collect();
        assert_eq!(descendants.len(), 3);
        assert!(descendants.contains(&n("b")));
        assert!(descendants.contains(&n("c")));
        assert!(descendants.contains(&n("d")));
        // d is only reachable after both b and c have been discovered
        assert_eq!(descendants.last(), Some(&n("d")));
    }

    #[test]
    fn get_ancestors_explores_one_branch_fully_before_the_next_in_dfs_order() {
        let g = graph();
        for name in ["a", "b", "c", "x", "d"] {
            g.add_node(n(name), PropertyMap::new()).unwrap();
        }
        // d's parents are the tip of a three-deep chain (c -> b -> a) and a
        // lone sibling x. BFS would interleave x between c and b (same
        // level); DFS must walk the whole c -> b -> a chain contiguously
        // before (or after) ever touching x.
        g.add_edge(EdgeID::new(n("c"), n("d"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("x"), n("d"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("b"), n("c"), "r"), PropertyMap::new())
            .unwrap();
        g.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap();

        let order: Vec<NodeID> = g.ancestors(&n("d"), None).map(Result::unwrap).collect();
        assert_eq!(order.len(), 4);

        let pos = |id: &NodeID| order.iter().position(|x| x == id).unwrap();
        let (c_idx, b_idx, a_idx) = (pos(&n("c")), pos(&n("b")), pos(&n("a")));
        assert!(c_idx < b_idx && b_idx < a_idx);
        // nothing (i.e. x) interleaves between c and a
        assert_eq!(a_idx - c_idx, 2);
    }

    #[test]
    fn deleting_node_drops_its_edges_from_the_cached_edge_ids() {
        let g = graph();
        g.add_node(n("a"), PropertyMap::new()).unwrap();
        g.add_node(n("b"), PropertyMap::new()).unwrap();
        g.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap();
        g.delete_node(&n("a")).unwrap();
        assert!(g.edge_ids().is_empty());
        assert_eq!(g.node_ids(), HashSet::from([n("b")]));
    }
}
