//! In-memory reference storage (C5). Single-threaded only: `NativeStorage`
//! is `Send` but not `Sync` — the `RefCell` inside gives the compiler no
//! way to let two threads share a `&NativeStorage` safely, so "concurrent
//! use is undefined" is enforced at compile time rather than documented
//! only in prose. Wrap in [`crate::concurrent::ConcurrentStorage`] for a
//! thread-safe variant of the same semantics.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use gossamer_api::error::{Result, StorageError};
use gossamer_api::ids::{EdgeID, NodeID};
use gossamer_api::storage::{PropertyMap, PropertyPatch, Storage};
use gossamer_api::value::Value;

use crate::inner::GraphInner;

#[derive(Debug, Default)]
pub struct NativeStorage {
    inner: RefCell<GraphInner>,
    closed: Cell<bool>,
}

impl NativeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<()> {
        if self.closed.get() {
            Err(StorageError::AccessClosedStorage)
        } else {
            Ok(())
        }
    }
}

impl Storage for NativeStorage {
    fn contains_node(&self, id: &NodeID) -> bool {
        !self.closed.get() && self.inner.borrow().contains_node(id)
    }

    fn contains_edge(&self, id: &EdgeID) -> bool {
        !self.closed.get() && self.inner.borrow().contains_edge(id)
    }

    fn node_ids(&self) -> Result<HashSet<NodeID>> {
        self.check_open()?;
        Ok(self.inner.borrow().node_ids())
    }

    fn edge_ids(&self) -> Result<HashSet<EdgeID>> {
        self.check_open()?;
        Ok(self.inner.borrow().edge_ids())
    }

    fn node_count(&self) -> Result<usize> {
        self.check_open()?;
        Ok(self.inner.borrow().node_count())
    }

    fn edge_count(&self) -> Result<usize> {
        self.check_open()?;
        Ok(self.inner.borrow().edge_count())
    }

    fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().add_node(id, props)
    }

    fn get_node_properties(&self, id: &NodeID) -> Result<PropertyMap> {
        self.check_open()?;
        self.inner.borrow().get_node_properties(id)
    }

    fn set_node_properties(&self, id: &NodeID, patch: PropertyPatch) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().set_node_properties(id, patch)
    }

    fn delete_node(&self, id: &NodeID) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().delete_node(id)
    }

    fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().add_edge(id, props)
    }

    fn get_edge_properties(&self, id: &EdgeID) -> Result<PropertyMap> {
        self.check_open()?;
        self.inner.borrow().get_edge_properties(id)
    }

    fn set_edge_properties(&self, id: &EdgeID, patch: PropertyPatch) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().set_edge_properties(id, patch)
    }

    fn delete_edge(&self, id: &EdgeID) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().delete_edge(id)
    }

    fn incoming_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        self.check_open()?;
        self.inner.borrow().incoming_edges(id)
    }

    fn outgoing_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        self.check_open()?;
        self.inner.borrow().outgoing_edges(id)
    }

    fn get_meta(&self, name: &str) -> Result<Option<Value>> {
        self.check_open()?;
        Ok(self.inner.borrow().get_meta(name))
    }

    fn set_meta(&self, name: &str, value: Option<Value>) -> Result<()> {
        self.check_open()?;
        self.inner.borrow_mut().set_meta(name, value);
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        self.check_open()?;
        Ok(self.inner.borrow_mut().clear())
    }

    fn close(&self) -> Result<()> {
        self.closed.set(true);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(name: &str) -> NodeID {
        NodeID::new(name)
    }

    #[test]
    fn s1_basic_crud() {
        let s = NativeStorage::new();
        s.add_node(n("a"), PropertyMap::new()).unwrap();
        let mut b_props = PropertyMap::new();
        b_props.insert("w".into(), Value::Int(3));
        s.add_node(n("b"), b_props).unwrap();
        let edge = EdgeID::new(n("a"), n("b"), "r");
        let mut e_props = PropertyMap::new();
        e_props.insert("k".into(), Value::string("v"));
        s.add_edge(edge.clone(), e_props).unwrap();

        assert_eq!(s.node_ids().unwrap(), HashSet::from([n("a"), n("b")]));
        assert_eq!(s.edge_ids().unwrap(), HashSet::from([edge.clone()]));
        assert_eq!(
            s.get_node_properties(&n("b")).unwrap().get("w"),
            Some(&Value::Int(3))
        );
        assert_eq!(
            s.outgoing_edges(&n("a")).unwrap(),
            HashSet::from([edge.clone()])
        );
        assert_eq!(s.incoming_edges(&n("b")).unwrap(), HashSet::from([edge]));
    }

    #[test]
    fn s2_cascading_delete() {
        let s = NativeStorage::new();
        s.add_node(n("a"), PropertyMap::new()).unwrap();
        s.add_node(n("b"), PropertyMap::new()).unwrap();
        s.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap();

        s.delete_node(&n("a")).unwrap();

        assert_eq!(s.node_ids().unwrap(), HashSet::from([n("b")]));
        assert!(s.edge_ids().unwrap().is_empty());
        assert!(s.incoming_edges(&n("b")).unwrap().is_empty());
    }

    #[test]
    fn add_node_twice_raises_already_exist() {
        let s = NativeStorage::new();
        s.add_node(n("a"), PropertyMap::new()).unwrap();
        let err = s.add_node(n("a"), PropertyMap::new()).unwrap_err();
        assert_eq!(err, StorageError::NodeAlreadyExist(n("a")));
    }

    #[test]
    fn add_edge_with_missing_endpoint_raises_not_exist() {
        let s = NativeStorage::new();
        s.add_node(n("a"), PropertyMap::new()).unwrap();
        let err = s
            .add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
            .unwrap_err();
        assert_eq!(err, StorageError::NodeNotExist(n("b")));
    }

    #[test]
    fn closed_storage_rejects_every_operation() {
        let s = NativeStorage::new();
        s.add_node(n("a"), PropertyMap::new()).unwrap();
        s.close().unwrap();
        assert_eq!(
            s.add_node(n("b"), PropertyMap::new()).unwrap_err(),
            StorageError::AccessClosedStorage
        );
        assert_eq!(
            s.get_node_properties(&n("a")).unwrap_err(),
            StorageError::AccessClosedStorage
        );
        assert_eq!(s.clear().unwrap_err(), StorageError::AccessClosedStorage);
        assert!(!s.contains_node(&n("a")));
    }

    #[test]
    fn close_is_idempotent() {
        let s = NativeStorage::new();
        s.close().unwrap();
        s.close().unwrap();
        assert!(s.is_closed());
    }

    #[test]
    fn bulk_delete_nodes_snapshots_before_iterating() {
        let s = NativeStorage::new();
        for name in ["a", "b", "c"] {
            s.add_node(n(name), PropertyMap::new()).unwrap();
        }
        let deleted = s.delete_nodes(&|id: &NodeID| id.name() != "b").unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(s.node_ids().unwrap(), HashSet::from([n("b")]));
    }
}
