//! Thread-safe native storage (C6): identical semantics to
//! [`crate::native::NativeStorage`], augmented with a multi-reader /
//! single-writer discipline over the whole store via one
//! `std::sync::RwLock`, mirroring the lock discipline
//! `nervusdb_v2_storage::engine::GraphEngine` uses for its own state
//! (`Arc<RwLock<Pager>>`, `Mutex<..>` fields guarding composite writes).
//!
//! A single lock over the entire store — rather than per-map locks —
//! is what rules out torn adjacency: a reader can never observe an edge
//! present in the property map but missing from one endpoint's adjacency
//! set, because no writer can be interleaved inside a single `read()`
//! critical section.

use std::collections::HashSet;
use std::sync::RwLock;

use gossamer_api::error::{Result, StorageError};
use gossamer_api::ids::{EdgeID, NodeID};
use gossamer_api::storage::{PropertyMap, PropertyPatch, Storage};
use gossamer_api::value::Value;

use crate::inner::GraphInner;

#[derive(Debug, Default)]
struct State {
    inner: GraphInner,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct ConcurrentStorage {
    state: RwLock<State>,
}

impl ConcurrentStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for ConcurrentStorage {
    fn contains_node(&self, id: &NodeID) -> bool {
        let state = self.state.read().unwrap();
        !state.closed && state.inner.contains_node(id)
    }

    fn contains_edge(&self, id: &EdgeID) -> bool {
        let state = self.state.read().unwrap();
        !state.closed && state.inner.contains_edge(id)
    }

    fn node_ids(&self) -> Result<HashSet<NodeID>> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.node_ids())
    }

    fn edge_ids(&self) -> Result<HashSet<EdgeID>> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.edge_ids())
    }

    fn node_count(&self) -> Result<usize> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.node_count())
    }

    fn edge_count(&self) -> Result<usize> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.edge_count())
    }

    fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.add_node(id, props)
    }

    fn get_node_properties(&self, id: &NodeID) -> Result<PropertyMap> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.get_node_properties(id)
    }

    fn set_node_properties(&self, id: &NodeID, patch: PropertyPatch) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.set_node_properties(id, patch)
    }

    fn delete_node(&self, id: &NodeID) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.delete_node(id)
    }

    fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.add_edge(id, props)
    }

    fn get_edge_properties(&self, id: &EdgeID) -> Result<PropertyMap> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.get_edge_properties(id)
    }

    fn set_edge_properties(&self, id: &EdgeID, patch: PropertyPatch) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.set_edge_properties(id, patch)
    }

    fn delete_edge(&self, id: &EdgeID) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.delete_edge(id)
    }

    fn incoming_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.incoming_edges(id)
    }

    fn outgoing_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.outgoing_edges(id)
    }

    /// One write-lock acquisition for the whole batch, not a loop of
    /// individually-locked `delete_node` calls (§4.5).
    fn delete_nodes(&self, pred: &dyn Fn(&NodeID) -> bool) -> Result<usize> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let targets: Vec<NodeID> = state.inner.node_ids().into_iter().filter(pred).collect();
        let mut deleted = 0;
        for id in targets {
            if state.inner.delete_node(&id).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn delete_edges(&self, pred: &dyn Fn(&EdgeID) -> bool) -> Result<usize> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let targets: Vec<EdgeID> = state.inner.edge_ids().into_iter().filter(pred).collect();
        let mut deleted = 0;
        for id in targets {
            if state.inner.delete_edge(&id).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn get_meta(&self, name: &str) -> Result<Option<Value>> {
        let state = self.state.read().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.get_meta(name))
    }

    fn set_meta(&self, name: &str, value: Option<Value>) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        state.inner.set_meta(name, value);
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        if state.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(state.inner.clear())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.read().unwrap().closed
    }
}
