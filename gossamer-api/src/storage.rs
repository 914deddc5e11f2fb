use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::ids::{EdgeID, NodeID};
use crate::value::Value;

pub type PropertyMap = HashMap<String, Value>;
/// A property patch: `None` deletes the key, `Some(v)` inserts/replaces it.
pub type PropertyPatch = HashMap<String, Option<Value>>;

/// The contract every storage backend satisfies (C4).
///
/// All methods take `&self`; backends provide their own interior
/// mutability (a `RefCell` for the single-threaded [`NativeStorage`], an
/// `RwLock` for [`ConcurrentStorage`]) so that callers can hold a shared
/// reference — an [`crate::entity::Entity`] or a graph façade — without
/// the backend dictating a particular ownership shape upstream.
///
/// Every call must check closure, then precondition, then mutate; a
/// failed precondition must leave the store completely unchanged.
pub trait Storage {
    fn contains_node(&self, id: &NodeID) -> bool;
    fn contains_edge(&self, id: &EdgeID) -> bool;

    /// A snapshot of the current node id set.
    fn node_ids(&self) -> Result<HashSet<NodeID>>;
    /// A snapshot of the current edge id set.
    fn edge_ids(&self) -> Result<HashSet<EdgeID>>;

    fn node_count(&self) -> Result<usize>;
    fn edge_count(&self) -> Result<usize>;

    fn add_node(&self, id: NodeID, props: PropertyMap) -> Result<()>;
    fn get_node_properties(&self, id: &NodeID) -> Result<PropertyMap>;
    fn set_node_properties(&self, id: &NodeID, patch: PropertyPatch) -> Result<()>;
    fn delete_node(&self, id: &NodeID) -> Result<()>;

    fn add_edge(&self, id: EdgeID, props: PropertyMap) -> Result<()>;
    fn get_edge_properties(&self, id: &EdgeID) -> Result<PropertyMap>;
    fn set_edge_properties(&self, id: &EdgeID, patch: PropertyPatch) -> Result<()>;
    fn delete_edge(&self, id: &EdgeID) -> Result<()>;

    /// Exact set of edges with `dst = id`.
    fn incoming_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>>;
    /// Exact set of edges with `src = id`.
    fn outgoing_edges(&self, id: &NodeID) -> Result<HashSet<EdgeID>>;

    /// Deletes every node matching `pred`, snapshotting the id set first.
    /// Errors for individually-targeted ids (e.g. a concurrent removal)
    /// are swallowed, not propagated — the set was snapshotted at entry.
    fn delete_nodes(&self, pred: &dyn Fn(&NodeID) -> bool) -> Result<usize> {
        let targets: Vec<NodeID> = self.node_ids()?.into_iter().filter(pred).collect();
        let mut deleted = 0;
        for id in targets {
            if self.delete_node(&id).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Deletes every edge matching `pred`, snapshotting the id set first.
    fn delete_edges(&self, pred: &dyn Fn(&EdgeID) -> bool) -> Result<usize> {
        let targets: Vec<EdgeID> = self.edge_ids()?.into_iter().filter(pred).collect();
        let mut deleted = 0;
        for id in targets {
            if self.delete_edge(&id).is_ok() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// All edges from `from` to `to`, regardless of relation name.
    fn edges_between(&self, from: &NodeID, to: &NodeID) -> Result<HashSet<EdgeID>> {
        Ok(self
            .outgoing_edges(from)?
            .into_iter()
            .filter(|e| &e.dst == to)
            .collect())
    }

    fn get_meta(&self, name: &str) -> Result<Option<Value>>;
    fn set_meta(&self, name: &str, value: Option<Value>) -> Result<()>;

    /// Empties nodes, edges and metadata. Returns whether the store is
    /// empty afterwards (always `true` on success).
    fn clear(&self) -> Result<bool>;

    /// Permanently closes the storage. Idempotent.
    fn close(&self) -> Result<()>;
    fn is_closed(&self) -> bool;
}
