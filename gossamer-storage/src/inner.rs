//! The shared CRUD/adjacency algorithm behind both [`crate::native::NativeStorage`]
//! and [`crate::concurrent::ConcurrentStorage`] (C5/C6 of SPEC_FULL.md).
//!
//! `GraphInner` assumes the closed-check has already happened in the
//! caller; it only implements the data-structure algorithm (§4.4), not
//! the closure/locking discipline layered on top of it.

use std::collections::{HashMap, HashSet};

use gossamer_api::error::StorageError;
use gossamer_api::ids::{EdgeID, NodeID};
use gossamer_api::storage::{PropertyMap, PropertyPatch};
use gossamer_api::value::Value;

#[derive(Debug, Default)]
pub struct GraphInner {
    n_props: HashMap<NodeID, PropertyMap>,
    e_props: HashMap<EdgeID, PropertyMap>,
    n_in: HashMap<NodeID, HashSet<EdgeID>>,
    n_out: HashMap<NodeID, HashSet<EdgeID>>,
    meta: PropertyMap,
}

impl GraphInner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_node(&self, id: &NodeID) -> bool {
        self.n_props.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeID) -> bool {
        self.e_props.contains_key(id)
    }

    pub fn node_ids(&self) -> HashSet<NodeID> {
        self.n_props.keys().cloned().collect()
    }

    pub fn edge_ids(&self) -> HashSet<EdgeID> {
        self.e_props.keys().cloned().collect()
    }

    pub fn node_count(&self) -> usize {
        self.n_props.len()
    }

    pub fn edge_count(&self) -> usize {
        self.e_props.len()
    }

    pub fn add_node(&mut self, id: NodeID, props: PropertyMap) -> Result<(), StorageError> {
        if self.contains_node(&id) {
            return Err(StorageError::NodeAlreadyExist(id));
        }
        self.n_in.insert(id.clone(), HashSet::new());
        self.n_out.insert(id.clone(), HashSet::new());
        self.n_props.insert(id, props);
        Ok(())
    }

    pub fn get_node_properties(&self, id: &NodeID) -> Result<PropertyMap, StorageError> {
        self.n_props
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NodeNotExist(id.clone()))
    }

    pub fn set_node_properties(
        &mut self,
        id: &NodeID,
        patch: PropertyPatch,
    ) -> Result<(), StorageError> {
        let props = self
            .n_props
            .get_mut(id)
            .ok_or_else(|| StorageError::NodeNotExist(id.clone()))?;
        apply_patch(props, patch);
        Ok(())
    }

    /// `O(|in(n)| + |out(n)|)`: cascades into every touching edge.
    pub fn delete_node(&mut self, id: &NodeID) -> Result<(), StorageError> {
        if !self.contains_node(id) {
            return Err(StorageError::NodeNotExist(id.clone()));
        }
        let touching: HashSet<EdgeID> = self
            .n_in
            .get(id)
            .into_iter()
            .flatten()
            .chain(self.n_out.get(id).into_iter().flatten())
            .cloned()
            .collect();
        for edge in touching {
            self.remove_edge_everywhere(&edge);
        }
        self.n_props.remove(id);
        self.n_in.remove(id);
        self.n_out.remove(id);
        Ok(())
    }

    pub fn add_edge(&mut self, id: EdgeID, props: PropertyMap) -> Result<(), StorageError> {
        if self.contains_edge(&id) {
            return Err(StorageError::EdgeAlreadyExist(id));
        }
        if !self.contains_node(&id.src) {
            return Err(StorageError::NodeNotExist(id.src));
        }
        if !self.contains_node(&id.dst) {
            return Err(StorageError::NodeNotExist(id.dst));
        }
        self.n_out.get_mut(&id.src).unwrap().insert(id.clone());
        self.n_in.get_mut(&id.dst).unwrap().insert(id.clone());
        self.e_props.insert(id, props);
        Ok(())
    }

    pub fn get_edge_properties(&self, id: &EdgeID) -> Result<PropertyMap, StorageError> {
        self.e_props
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::EdgeNotExist(id.clone()))
    }

    pub fn set_edge_properties(
        &mut self,
        id: &EdgeID,
        patch: PropertyPatch,
    ) -> Result<(), StorageError> {
        let props = self
            .e_props
            .get_mut(id)
            .ok_or_else(|| StorageError::EdgeNotExist(id.clone()))?;
        apply_patch(props, patch);
        Ok(())
    }

    pub fn delete_edge(&mut self, id: &EdgeID) -> Result<(), StorageError> {
        if !self.contains_edge(id) {
            return Err(StorageError::EdgeNotExist(id.clone()));
        }
        self.remove_edge_everywhere(id);
        Ok(())
    }

    fn remove_edge_everywhere(&mut self, id: &EdgeID) {
        if let Some(out) = self.n_out.get_mut(&id.src) {
            out.remove(id);
        }
        if let Some(inc) = self.n_in.get_mut(&id.dst) {
            inc.remove(id);
        }
        self.e_props.remove(id);
    }

    pub fn incoming_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>, StorageError> {
        self.n_in
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NodeNotExist(id.clone()))
    }

    pub fn outgoing_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>, StorageError> {
        self.n_out
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NodeNotExist(id.clone()))
    }

    pub fn get_meta(&self, name: &str) -> Option<Value> {
        self.meta.get(name).cloned()
    }

    pub fn set_meta(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(v) => {
                self.meta.insert(name.to_string(), v);
            }
            None => {
                self.meta.remove(name);
            }
        }
    }

    /// Empties everything; returns whether the store is now empty.
    pub fn clear(&mut self) -> bool {
        self.n_props.clear();
        self.e_props.clear();
        self.n_in.clear();
        self.n_out.clear();
        self.meta.clear();
        self.n_props.is_empty() && self.e_props.is_empty() && self.meta.is_empty()
    }
}

pub fn apply_patch(props: &mut PropertyMap, patch: PropertyPatch) {
    for (key, value) in patch {
        match value {
            Some(v) => {
                props.insert(key, v);
            }
            None => {
                props.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(name: &str) -> NodeID {
        NodeID::new(name)
    }

    #[test]
    fn delete_node_cascades_to_touching_edges() {
        let mut g = GraphInner::new();
        g.add_node(n("a"), PropertyMap::new()).unwrap();
        g.add_node(n("b"), PropertyMap::new()).unwrap();
        g.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap();
        g.delete_node(&n("a")).unwrap();
        assert!(!g.contains_node(&n("a")));
        assert_eq!(g.edge_count(), 0);
        assert!(g.incoming_edges(&n("b")).unwrap().is_empty());
    }

    #[test]
    fn self_loop_appears_in_both_adjacency_sets() {
        let mut g = GraphInner::new();
        g.add_node(n("a"), PropertyMap::new()).unwrap();
        let e = EdgeID::new(n("a"), n("a"), "loop");
        g.add_edge(e.clone(), PropertyMap::new()).unwrap();
        assert!(g.incoming_edges(&n("a")).unwrap().contains(&e));
        assert!(g.outgoing_edges(&n("a")).unwrap().contains(&e));
    }

    #[test]
    fn set_properties_null_deletes_and_leaves_others() {
        let mut g = GraphInner::new();
        let mut props = PropertyMap::new();
        props.insert("a".into(), Value::Int(1));
        props.insert("b".into(), Value::Int(2));
        g.add_node(n("x"), props).unwrap();

        let mut patch = PropertyPatch::new();
        patch.insert("a".into(), None);
        patch.insert("c".into(), Some(Value::Int(3)));
        g.set_node_properties(&n("x"), patch).unwrap();

        let result = g.get_node_properties(&n("x")).unwrap();
        assert_eq!(result.get("a"), None);
        assert_eq!(result.get("b"), Some(&Value::Int(2)));
        assert_eq!(result.get("c"), Some(&Value::Int(3)));
    }
}
