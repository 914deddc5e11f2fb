//! Entity façade integration, plus invariants that cut across backends
//! (closure, round-trip ids, add-twice collision).

use std::sync::Arc;

use gossamer::{
    ConcurrentStorage, DeltaStorage, EdgeID, Entity, NativeStorage, NodeID, PropertyBinding,
    PropertyMap, SimpleGraph, Storage, StorageError, Value,
};

fn n(name: &str) -> NodeID {
    NodeID::new(name)
}

#[test]
fn entity_facade_roundtrips_through_a_graph_handle() {
    let graph = SimpleGraph::new(Arc::new(NativeStorage::new())).unwrap();
    let alice = graph.add_node(n("alice"), PropertyMap::new()).unwrap();

    let age: PropertyBinding<_, i64> = PropertyBinding::new(alice.clone(), "age", 0);
    assert_eq!(age.get().unwrap(), 0);
    age.set(30).unwrap();

    let alice_again = graph.get_node(&n("alice")).unwrap();
    assert_eq!(alice_again, alice);
    assert_eq!(
        alice_again.get_prop("age").unwrap(),
        Some(Value::Int(30))
    );
}

#[test]
fn entity_facade_rejects_reserved_property_prefix() {
    let graph = SimpleGraph::new(Arc::new(NativeStorage::new())).unwrap();
    let node = graph.add_node(n("x"), PropertyMap::new()).unwrap();
    let err = node.set_prop("meta_internal", Some(Value::Int(1))).unwrap_err();
    assert!(matches!(err, StorageError::InvalidPropName { .. }));
}

#[test]
fn node_id_and_edge_id_round_trip_through_serialize_parse() {
    let node = n("a");
    assert_eq!(NodeID::parse(&node.serialize()).unwrap(), node);

    let edge = EdgeID::new(n("a"), n("b"), "r");
    assert_eq!(EdgeID::parse(&edge.serialize()).unwrap(), edge);
}

fn closed_storage_rejects_everything(storage: &impl Storage) {
    storage.add_node(n("a"), PropertyMap::new()).unwrap();
    storage.close().unwrap();
    assert_eq!(
        storage.add_node(n("b"), PropertyMap::new()).unwrap_err(),
        StorageError::AccessClosedStorage
    );
    assert!(!storage.contains_node(&n("a")));
    // idempotent
    storage.close().unwrap();
}

#[test]
fn closed_storage_native() {
    closed_storage_rejects_everything(&NativeStorage::new());
}

#[test]
fn closed_storage_concurrent() {
    closed_storage_rejects_everything(&ConcurrentStorage::new());
}

#[test]
fn closing_a_delta_leaves_its_base_open_and_intact() {
    let base = Arc::new(NativeStorage::new());
    base.add_node(n("a"), PropertyMap::new()).unwrap();

    let delta: DeltaStorage<NativeStorage, NativeStorage> =
        DeltaStorage::new(Arc::clone(&base)).unwrap();
    delta.close().unwrap();

    assert!(delta.is_closed());
    assert!(!base.is_closed());
    assert!(base.contains_node(&n("a")));
}

#[test]
fn delta_over_concurrent_base_and_present_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DeltaStorage<ConcurrentStorage, ConcurrentStorage>>();
}

#[test]
fn add_node_twice_raises_already_exist() {
    let storage = NativeStorage::new();
    storage.add_node(n("a"), PropertyMap::new()).unwrap();
    assert_eq!(
        storage.add_node(n("a"), PropertyMap::new()).unwrap_err(),
        StorageError::NodeAlreadyExist(n("a"))
    );
}
