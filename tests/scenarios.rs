//! End-to-end scenarios S1-S6, run against every backend that makes
//! sense for the scenario.

use std::sync::Arc;

use gossamer::{
    ConcurrentStorage, DeltaStorage, EdgeID, MultiGraph, NativeStorage, NodeID, PropertyMap,
    SimpleGraph, Storage, Value,
};

fn n(name: &str) -> NodeID {
    NodeID::new(name)
}

fn props(pairs: &[(&str, Value)]) -> PropertyMap {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}

fn s1_basic_crud(storage: &impl Storage) {
    storage.add_node(n("a"), PropertyMap::new()).unwrap();
    storage
        .add_node(n("b"), props(&[("w", Value::Int(3))]))
        .unwrap();
    storage
        .add_edge(
            EdgeID::new(n("a"), n("b"), "r"),
            props(&[("k", Value::string("v"))]),
        )
        .unwrap();

    assert_eq!(
        storage.node_ids().unwrap(),
        std::collections::HashSet::from([n("a"), n("b")])
    );
    assert_eq!(
        storage.edge_ids().unwrap(),
        std::collections::HashSet::from([EdgeID::new(n("a"), n("b"), "r")])
    );
    assert_eq!(
        storage.get_node_properties(&n("b")).unwrap().get("w"),
        Some(&Value::Int(3))
    );
    assert_eq!(
        storage.outgoing_edges(&n("a")).unwrap(),
        std::collections::HashSet::from([EdgeID::new(n("a"), n("b"), "r")])
    );
    assert_eq!(
        storage.incoming_edges(&n("b")).unwrap(),
        std::collections::HashSet::from([EdgeID::new(n("a"), n("b"), "r")])
    );
}

#[test]
fn s1_native() {
    s1_basic_crud(&NativeStorage::new());
}

#[test]
fn s1_concurrent() {
    s1_basic_crud(&ConcurrentStorage::new());
}

fn s2_cascading_delete(storage: &impl Storage) {
    s1_basic_crud(storage);
    storage.delete_node(&n("a")).unwrap();
    assert_eq!(storage.node_ids().unwrap(), std::collections::HashSet::from([n("b")]));
    assert!(storage.edge_ids().unwrap().is_empty());
    assert!(storage.incoming_edges(&n("b")).unwrap().is_empty());
}

#[test]
fn s2_native() {
    s2_cascading_delete(&NativeStorage::new());
}

#[test]
fn s2_concurrent() {
    s2_cascading_delete(&ConcurrentStorage::new());
}

fn s3_property_null_deletes(storage: &impl Storage) {
    storage
        .add_node(n("x"), props(&[("a", Value::Int(1)), ("b", Value::Int(2))]))
        .unwrap();
    let mut patch = gossamer::PropertyPatch::new();
    patch.insert("a".into(), None);
    patch.insert("c".into(), Some(Value::Int(3)));
    storage.set_node_properties(&n("x"), patch).unwrap();

    let result = storage.get_node_properties(&n("x")).unwrap();
    assert_eq!(result.get("a"), None);
    assert_eq!(result.get("b"), Some(&Value::Int(2)));
    assert_eq!(result.get("c"), Some(&Value::Int(3)));
}

#[test]
fn s3_native() {
    s3_property_null_deletes(&NativeStorage::new());
}

#[test]
fn s3_concurrent() {
    s3_property_null_deletes(&ConcurrentStorage::new());
}

#[test]
fn s4_delta_overlay() {
    let base = NativeStorage::new();
    base.add_node(n("a"), props(&[("name", Value::string("A"))]))
        .unwrap();
    base.add_node(n("b"), PropertyMap::new()).unwrap();
    base.add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
        .unwrap();
    let base = Arc::new(base);

    let delta: DeltaStorage<NativeStorage, NativeStorage> =
        DeltaStorage::new(Arc::clone(&base)).unwrap();

    let mut patch = gossamer::PropertyPatch::new();
    patch.insert("name".into(), Some(Value::string("A2")));
    patch.insert("extra".into(), Some(Value::Int(7)));
    delta.set_node_properties(&n("a"), patch).unwrap();
    delta.delete_edge(&EdgeID::new(n("a"), n("b"), "r")).unwrap();

    let a_props = delta.get_node_properties(&n("a")).unwrap();
    assert_eq!(a_props.get("name"), Some(&Value::string("A2")));
    assert_eq!(a_props.get("extra"), Some(&Value::Int(7)));
    assert!(!delta.contains_edge(&EdgeID::new(n("a"), n("b"), "r")));

    assert!(base.contains_edge(&EdgeID::new(n("a"), n("b"), "r")));
    assert_eq!(
        base.get_node_properties(&n("a")).unwrap().get("name"),
        Some(&Value::string("A"))
    );
}

#[test]
fn s5_simple_vs_multi() {
    let simple = SimpleGraph::new(Arc::new(NativeStorage::new())).unwrap();
    simple.add_node(n("a"), PropertyMap::new()).unwrap();
    simple.add_node(n("b"), PropertyMap::new()).unwrap();
    simple
        .add_edge(EdgeID::new(n("a"), n("b"), "r1"), PropertyMap::new())
        .unwrap();
    assert!(simple
        .add_edge(EdgeID::new(n("a"), n("b"), "r2"), PropertyMap::new())
        .is_err());

    let multi = MultiGraph::new(Arc::new(NativeStorage::new())).unwrap();
    multi.add_node(n("a"), PropertyMap::new()).unwrap();
    multi.add_node(n("b"), PropertyMap::new()).unwrap();
    multi
        .add_edge(EdgeID::new(n("a"), n("b"), "r1"), PropertyMap::new())
        .unwrap();
    multi
        .add_edge(EdgeID::new(n("a"), n("b"), "r2"), PropertyMap::new())
        .unwrap();
    assert_eq!(multi.edge_ids().len(), 2);
}

#[test]
fn s6_traversal_bfs_order() {
    let graph = SimpleGraph::new(Arc::new(NativeStorage::new())).unwrap();
    for name in ["a", "b", "c", "d"] {
        graph.add_node(n(name), PropertyMap::new()).unwrap();
    }
    graph
        .add_edge(EdgeID::new(n("a"), n("b"), "r"), PropertyMap::new())
        .unwrap();
    graph
        .add_edge(EdgeID::new(n("b"), n("c"), "r"), PropertyMap::new())
        .unwrap();
    graph
        .add_edge(EdgeID::new(n("a"), n("d"), "r"), PropertyMap::new())
        .unwrap();

    let order: Vec<NodeID> = graph
        .descendants(&n("a"), None)
        .map(std::result::Result::unwrap)
        .collect();
    assert_eq!(order.len(), 3);
    let c_index = order.iter().position(|x| x == &n("c")).unwrap();
    let b_index = order.iter().position(|x| x == &n("b")).unwrap();
    let d_index = order.iter().position(|x| x == &n("d")).unwrap();
    assert!(c_index > b_index);
    assert!(c_index > d_index);
}
