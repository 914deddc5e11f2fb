//! The delta overlay (C7): a mutable `present` storage layered over an
//! immutable `base`, so many sessions can share one base snapshot while
//! each accumulates private edits.
//!
//! Grounded on `nervusdb-storage`'s `snapshot::L0Run` — an LSM-style run
//! that carries `tombstoned_nodes`/`tombstoned_edges` alongside its own
//! `node_properties`/`edge_properties` overlay, the same
//! base-plus-overlay-plus-tombstone shape specified here, just without
//! the multi-run merge machinery (a delta only ever has one overlay).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use gossamer_api::error::{Result, StorageError};
use gossamer_api::ids::{EdgeID, NodeID};
use gossamer_api::storage::{PropertyMap, PropertyPatch, Storage};
use gossamer_api::value::Value;

/// Per-property tombstone sentinel (§4.6, §9). A user who stores this
/// exact string as a property value will see it hidden by delta reads —
/// a documented artifact of the overlay design, not strengthened into a
/// distinct `Value` variant here so that `Value`'s wire shape stays
/// whatever a host application already persists.
pub const TOMBSTONE_SENTINEL: &str = "_deleted_";

fn tombstone() -> Value {
    Value::String(TOMBSTONE_SENTINEL.to_string())
}

fn is_tombstone(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == TOMBSTONE_SENTINEL)
}

fn union_len<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> usize {
    a.len() + b.iter().filter(|x| !a.contains(*x)).count()
}

#[derive(Debug)]
struct DeltaLocal {
    deleted_nodes: HashSet<NodeID>,
    deleted_edges: HashSet<EdgeID>,
    node_count: usize,
    edge_count: usize,
    closed: bool,
}

/// Two-layer overlay storage. `B` is the (possibly shared, possibly
/// concurrent) base layer; `P` is the private mutable present layer —
/// typically [`crate::native::NativeStorage`] or
/// [`crate::concurrent::ConcurrentStorage`].
#[derive(Debug)]
pub struct DeltaStorage<B: Storage, P: Storage> {
    base: Arc<B>,
    present: P,
    local: RwLock<DeltaLocal>,
}

impl<B: Storage, P: Storage + Default> DeltaStorage<B, P> {
    pub fn new(base: Arc<B>) -> Result<Self> {
        Self::with_present(base, P::default())
    }
}

impl<B: Storage, P: Storage> DeltaStorage<B, P> {
    pub fn with_present(base: Arc<B>, present: P) -> Result<Self> {
        let node_count = union_len(&base.node_ids()?, &present.node_ids()?);
        let edge_count = union_len(&base.edge_ids()?, &present.edge_ids()?);
        Ok(Self {
            base,
            present,
            local: RwLock::new(DeltaLocal {
                deleted_nodes: HashSet::new(),
                deleted_edges: HashSet::new(),
                node_count,
                edge_count,
                closed: false,
            }),
        })
    }

    /// The shared, immutable base layer this delta was built on.
    pub fn base(&self) -> &Arc<B> {
        &self.base
    }

    fn ensure_node_shadowed_in_present(&self, id: &NodeID) -> Result<()> {
        if !self.present.contains_node(id) {
            let props = if self.base.contains_node(id) {
                self.base.get_node_properties(id)?
            } else {
                PropertyMap::new()
            };
            self.present.add_node(id.clone(), props)?;
        }
        Ok(())
    }

    /// Recomputes counters from the effective view and warns if they had
    /// drifted from the cached values — the only way this can happen is
    /// `base` being mutated externally while this delta held a reference
    /// to it, which the contract requires callers not to do (§9) but
    /// which `Arc<B>` cannot prevent at the type level.
    pub fn reconcile_counts(&self) -> Result<()> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let actual_nodes = self.effective_node_ids(&local)?.len();
        let actual_edges = self.effective_edge_ids(&local)?.len();
        if actual_nodes != local.node_count || actual_edges != local.edge_count {
            tracing::warn!(
                cached_nodes = local.node_count,
                actual_nodes,
                cached_edges = local.edge_count,
                actual_edges,
                "delta storage counters drifted from the effective view; base was likely mutated externally"
            );
            local.node_count = actual_nodes;
            local.edge_count = actual_edges;
        }
        Ok(())
    }

    fn effective_node_ids(&self, local: &DeltaLocal) -> Result<HashSet<NodeID>> {
        let mut ids = self.base.node_ids()?;
        ids.extend(self.present.node_ids()?);
        for d in &local.deleted_nodes {
            ids.remove(d);
        }
        Ok(ids)
    }

    fn effective_edge_ids(&self, local: &DeltaLocal) -> Result<HashSet<EdgeID>> {
        let mut ids = self.base.edge_ids()?;
        ids.extend(self.present.edge_ids()?);
        for d in &local.deleted_edges {
            ids.remove(d);
        }
        Ok(ids)
    }

    /// Shadows out any property keys stale data (base or a leftover
    /// present entry) would otherwise contribute, then installs `props`
    /// — so that a `delete` immediately followed by an `add` of the same
    /// id leaves exactly the newly-added properties visible (§8 #10).
    fn install_fresh_node_properties(&self, id: &NodeID, props: PropertyMap) -> Result<()> {
        let base_has = self.base.contains_node(id);
        let present_has = self.present.contains_node(id);
        if !base_has && !present_has {
            self.present.add_node(id.clone(), props)?;
            return Ok(());
        }
        let mut patch: PropertyPatch = HashMap::new();
        if base_has {
            for key in self.base.get_node_properties(id)?.into_keys() {
                patch.insert(key, Some(tombstone()));
            }
        }
        if present_has {
            for key in self.present.get_node_properties(id)?.into_keys() {
                patch.entry(key).or_insert_with(|| Some(tombstone()));
            }
        }
        for (k, v) in props {
            patch.insert(k, Some(v));
        }
        if !present_has {
            self.present.add_node(id.clone(), PropertyMap::new())?;
        }
        self.present.set_node_properties(id, patch)
    }

    fn install_fresh_edge_properties(&self, id: &EdgeID, props: PropertyMap) -> Result<()> {
        let base_has = self.base.contains_edge(id);
        let present_has = self.present.contains_edge(id);
        if !base_has && !present_has {
            self.present.add_edge(id.clone(), props)?;
            return Ok(());
        }
        let mut patch: PropertyPatch = HashMap::new();
        if base_has {
            for key in self.base.get_edge_properties(id)?.into_keys() {
                patch.insert(key, Some(tombstone()));
            }
        }
        if present_has {
            for key in self.present.get_edge_properties(id)?.into_keys() {
                patch.entry(key).or_insert_with(|| Some(tombstone()));
            }
        }
        for (k, v) in props {
            patch.insert(k, Some(v));
        }
        if !present_has {
            self.present.add_edge(id.clone(), PropertyMap::new())?;
        }
        self.present.set_edge_properties(id, patch)
    }
}

impl<B: Storage, P: Storage> Storage for DeltaStorage<B, P> {
    fn contains_node(&self, id: &NodeID) -> bool {
        let local = self.local.read().unwrap();
        if local.closed || local.deleted_nodes.contains(id) {
            return false;
        }
        self.present.contains_node(id) || self.base.contains_node(id)
    }

    fn contains_edge(&self, id: &EdgeID) -> bool {
        let local = self.local.read().unwrap();
        if local.closed || local.deleted_edges.contains(id) {
            return false;
        }
        self.present.contains_edge(id) || self.base.contains_edge(id)
    }

    fn node_ids(&self) -> Result<HashSet<NodeID>> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        self.effective_node_ids(&local)
    }

    fn edge_ids(&self) -> Result<HashSet<EdgeID>> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        self.effective_edge_ids(&local)
    }

    fn node_count(&self) -> Result<usize> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(local.node_count)
    }

    fn edge_count(&self) -> Result<usize> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        Ok(local.edge_count)
    }

    fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<()> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let effectively_exists = !local.deleted_nodes.contains(&id)
            && (self.present.contains_node(&id) || self.base.contains_node(&id));
        if effectively_exists {
            return Err(StorageError::NodeAlreadyExist(id));
        }
        local.deleted_nodes.remove(&id);
        self.install_fresh_node_properties(&id, props)?;
        local.node_count += 1;
        Ok(())
    }

    fn get_node_properties(&self, id: &NodeID) -> Result<PropertyMap> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        if local.deleted_nodes.contains(id) {
            return Err(StorageError::NodeNotExist(id.clone()));
        }
        let base_has = self.base.contains_node(id);
        let present_has = self.present.contains_node(id);
        if !base_has && !present_has {
            return Err(StorageError::NodeNotExist(id.clone()));
        }
        let mut merged = PropertyMap::new();
        if base_has {
            merged.extend(self.base.get_node_properties(id)?);
        }
        if present_has {
            merged.extend(self.present.get_node_properties(id)?);
        }
        merged.retain(|_, v| !is_tombstone(v));
        Ok(merged)
    }

    fn set_node_properties(&self, id: &NodeID, patch: PropertyPatch) -> Result<()> {
        let local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let effectively_exists = !local.deleted_nodes.contains(id)
            && (self.present.contains_node(id) || self.base.contains_node(id));
        if !effectively_exists {
            return Err(StorageError::NodeNotExist(id.clone()));
        }
        let transformed: PropertyPatch = patch
            .into_iter()
            .map(|(k, v)| (k, Some(v.unwrap_or_else(tombstone))))
            .collect();
        if !self.present.contains_node(id) {
            let props: PropertyMap = transformed.into_iter().map(|(k, v)| (k, v.unwrap())).collect();
            self.present.add_node(id.clone(), props)?;
        } else {
            self.present.set_node_properties(id, transformed)?;
        }
        Ok(())
    }

    fn delete_node(&self, id: &NodeID) -> Result<()> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let in_present = self.present.contains_node(id);
        let in_base = self.base.contains_node(id);
        let effectively_exists = !local.deleted_nodes.contains(id) && (in_present || in_base);
        if !effectively_exists {
            return Err(StorageError::NodeNotExist(id.clone()));
        }

        local.node_count -= 1;

        if in_present {
            let p_in = self.present.incoming_edges(id)?;
            let p_out = self.present.outgoing_edges(id)?;
            let touching: HashSet<EdgeID> = p_in.union(&p_out).cloned().collect();
            self.present.delete_node(id)?;
            local.edge_count = local.edge_count.saturating_sub(touching.len());
        }
        if in_base {
            local.deleted_nodes.insert(id.clone());
            let b_in = self.base.incoming_edges(id)?;
            let b_out = self.base.outgoing_edges(id)?;
            let touching: HashSet<EdgeID> = b_in.union(&b_out).cloned().collect();
            local.edge_count = local.edge_count.saturating_sub(touching.len());
            for e in touching {
                local.deleted_edges.insert(e);
            }
        }
        Ok(())
    }

    fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<()> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let src_exists = !local.deleted_nodes.contains(&id.src)
            && (self.present.contains_node(&id.src) || self.base.contains_node(&id.src));
        if !src_exists {
            return Err(StorageError::NodeNotExist(id.src));
        }
        let dst_exists = !local.deleted_nodes.contains(&id.dst)
            && (self.present.contains_node(&id.dst) || self.base.contains_node(&id.dst));
        if !dst_exists {
            return Err(StorageError::NodeNotExist(id.dst));
        }
        let effectively_exists = !local.deleted_edges.contains(&id)
            && (self.present.contains_edge(&id) || self.base.contains_edge(&id));
        if effectively_exists {
            return Err(StorageError::EdgeAlreadyExist(id));
        }

        local.deleted_edges.remove(&id);
        self.ensure_node_shadowed_in_present(&id.src)?;
        self.ensure_node_shadowed_in_present(&id.dst)?;
        self.install_fresh_edge_properties(&id, props)?;
        local.edge_count += 1;
        Ok(())
    }

    fn get_edge_properties(&self, id: &EdgeID) -> Result<PropertyMap> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        if local.deleted_edges.contains(id) {
            return Err(StorageError::EdgeNotExist(id.clone()));
        }
        let base_has = self.base.contains_edge(id);
        let present_has = self.present.contains_edge(id);
        if !base_has && !present_has {
            return Err(StorageError::EdgeNotExist(id.clone()));
        }
        let mut merged = PropertyMap::new();
        if base_has {
            merged.extend(self.base.get_edge_properties(id)?);
        }
        if present_has {
            merged.extend(self.present.get_edge_properties(id)?);
        }
        merged.retain(|_, v| !is_tombstone(v));
        Ok(merged)
    }

    fn set_edge_properties(&self, id: &EdgeID, patch: PropertyPatch) -> Result<()> {
        let local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let effectively_exists = !local.deleted_edges.contains(id)
            && (self.present.contains_edge(id) || self.base.contains_edge(id));
        if !effectively_exists {
            return Err(StorageError::EdgeNotExist(id.clone()));
        }
        self.ensure_node_shadowed_in_present(&id.src)?;
        self.ensure_node_shadowed_in_present(&id.dst)?;
        let transformed: PropertyPatch = patch
            .into_iter()
            .map(|(k, v)| (k, Some(v.unwrap_or_else(tombstone))))
            .collect();
        if !self.present.contains_edge(id) {
            let props: PropertyMap = transformed.into_iter().map(|(k, v)| (k, v.unwrap())).collect();
            self.present.add_edge(id.clone(), props)?;
        } else {
            self.present.set_edge_properties(id, transformed)?;
        }
        Ok(())
    }

    fn delete_edge(&self, id: &EdgeID) -> Result<()> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let in_present = self.present.contains_edge(id);
        let in_base = self.base.contains_edge(id);
        let effectively_exists = !local.deleted_edges.contains(id) && (in_present || in_base);
        if !effectively_exists {
            return Err(StorageError::EdgeNotExist(id.clone()));
        }
        local.edge_count -= 1;
        if in_present {
            self.present.delete_edge(id)?;
        }
        if in_base {
            local.deleted_edges.insert(id.clone());
        }
        Ok(())
    }

    fn incoming_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let base_has = self.base.contains_node(id);
        let present_has = self.present.contains_node(id);
        if !local.deleted_nodes.contains(id) && (base_has || present_has) {
            let mut edges = HashSet::new();
            if base_has {
                edges.extend(self.base.incoming_edges(id)?);
            }
            if present_has {
                edges.extend(self.present.incoming_edges(id)?);
            }
            for e in &local.deleted_edges {
                edges.remove(e);
            }
            Ok(edges)
        } else {
            Err(StorageError::NodeNotExist(id.clone()))
        }
    }

    fn outgoing_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let base_has = self.base.contains_node(id);
        let present_has = self.present.contains_node(id);
        if !local.deleted_nodes.contains(id) && (base_has || present_has) {
            let mut edges = HashSet::new();
            if base_has {
                edges.extend(self.base.outgoing_edges(id)?);
            }
            if present_has {
                edges.extend(self.present.outgoing_edges(id)?);
            }
            for e in &local.deleted_edges {
                edges.remove(e);
            }
            Ok(edges)
        } else {
            Err(StorageError::NodeNotExist(id.clone()))
        }
    }

    fn get_meta(&self, name: &str) -> Result<Option<Value>> {
        let local = self.local.read().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        if let Some(v) = self.present.get_meta(name)? {
            return Ok(if is_tombstone(&v) { None } else { Some(v) });
        }
        self.base.get_meta(name)
    }

    fn set_meta(&self, name: &str, value: Option<Value>) -> Result<()> {
        let local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        self.present
            .set_meta(name, Some(value.unwrap_or_else(tombstone)))
    }

    /// Clears `present` and resets the delta's own tombstones/counters —
    /// this delta reverts to a pristine view of `base`, which is never
    /// touched (§4.6: "base is immutable").
    fn clear(&self) -> Result<bool> {
        let mut local = self.local.write().unwrap();
        if local.closed {
            return Err(StorageError::AccessClosedStorage);
        }
        let ok = self.present.clear()?;
        local.deleted_nodes.clear();
        local.deleted_edges.clear();
        local.node_count = self.base.node_count()?;
        local.edge_count = self.base.edge_count()?;
        Ok(ok)
    }

    fn close(&self) -> Result<()> {
        let mut local = self.local.write().unwrap();
        local.closed = true;
        if local.node_count > 0 || local.edge_count > 0 {
            tracing::debug!(
                nodes = local.node_count,
                edges = local.edge_count,
                "closing delta storage with outstanding effective content"
            );
        }
        self.present.close()
    }

    fn is_closed(&self) -> bool {
        self.local.read().unwrap().closed
    }
}
