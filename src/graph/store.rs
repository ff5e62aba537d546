//! In-memory graph storage implementation
//!
//! Nodes and edges live in arenas indexed by id, with per-node outgoing and
//! incoming adjacency lists kept in creation order. That order is what makes
//! traversal results reproducible run to run.

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{Direction, EdgeId, EdgeType, NodeId, TypeFilter};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Which end of an edge a failed endpoint check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur while building or editing the graph
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: {role} node {node} does not exist")]
    InvalidEndpoint { role: Endpoint, node: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Failure of a single-match property lookup.
///
/// "Nothing matched" and "more than one matched" are distinct variants so
/// callers cannot treat an ambiguous lookup as a hit.
#[derive(Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("No node has property {key} = {value}")]
    NotFound { key: String, value: PropertyValue },

    #[error("{count} nodes have property {key} = {value}, expected exactly one")]
    Ambiguous {
        key: String,
        value: PropertyValue,
        count: usize,
    },
}

/// In-memory graph storage
///
/// - nodes: arena of Node, slot = id - 1
/// - edges: arena of Edge, slot = id - 1
/// - outgoing: NodeId -> Vec<EdgeId> (adjacency list for outgoing edges)
/// - incoming: NodeId -> Vec<EdgeId> (adjacency list for incoming edges)
///
/// Mutation takes `&mut self`, so the borrow checker already rules out
/// changing the graph while a traversal holds `&GraphStore`.
#[derive(Debug, Default)]
pub struct GraphStore {
    /// Node storage in creation order
    nodes: Vec<Node>,

    /// Edge storage in creation order
    edges: Vec<Edge>,

    /// Outgoing edges for each node (adjacency list)
    outgoing: Vec<Vec<EdgeId>>,

    /// Incoming edges for each node (adjacency list)
    incoming: Vec<Vec<EdgeId>>,
}

fn slot(id: u64) -> Option<usize> {
    id.checked_sub(1).map(|s| s as usize)
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        GraphStore {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            outgoing: Vec::with_capacity(node_count),
            incoming: Vec::with_capacity(node_count),
        }
    }

    /// Create a node with the given properties. Always succeeds.
    pub fn create_node(&mut self, properties: PropertyMap) -> NodeId {
        let node_id = NodeId::new(self.nodes.len() as u64 + 1);
        self.nodes.push(Node::new(node_id, properties));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        node_id
    }

    /// Create a directed edge between two existing nodes.
    ///
    /// Fails with [`GraphError::InvalidEndpoint`] if either node is unknown;
    /// the store is unchanged in that case.
    pub fn create_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<EdgeType>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        let source_slot = self.node_slot(source).ok_or(GraphError::InvalidEndpoint {
            role: Endpoint::Source,
            node: source,
        })?;
        let target_slot = self.node_slot(target).ok_or(GraphError::InvalidEndpoint {
            role: Endpoint::Target,
            node: target,
        })?;

        let edge_id = EdgeId::new(self.edges.len() as u64 + 1);
        self.edges
            .push(Edge::new(edge_id, source, target, edge_type, properties));

        // Update adjacency lists
        self.outgoing[source_slot].push(edge_id);
        self.incoming[target_slot].push(edge_id);

        Ok(edge_id)
    }

    fn node_slot(&self, id: NodeId) -> Option<usize> {
        slot(id.as_u64()).filter(|&s| s < self.nodes.len())
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.node_slot(id).map(|s| &self.nodes[s])
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.node_slot(id).is_some()
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        slot(id.as_u64()).and_then(|s| self.edges.get(s))
    }

    /// Set a property on a node (graph construction only)
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let s = self
            .node_slot(node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(self.nodes[s].set_property(key, value))
    }

    /// Set a property on an edge (graph construction only)
    pub fn set_edge_property(
        &mut self,
        edge_id: EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<()> {
        let edge = slot(edge_id.as_u64())
            .and_then(|s| self.edges.get_mut(s))
            .ok_or(GraphError::EdgeNotFound(edge_id))?;
        edge.set_property(key, value);
        Ok(())
    }

    /// Find the single node whose property `key` equals `value`.
    ///
    /// Scans all nodes; zero or several matches are both errors.
    pub fn find_node_by_property(
        &self,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<NodeId, LookupError> {
        let value = value.into();
        let mut matches = self
            .nodes
            .iter()
            .filter(|n| n.get_property(key) == Some(&value))
            .map(|n| n.id);

        let first = matches.next();
        let rest = matches.count();
        match (first, rest) {
            (Some(id), 0) => Ok(id),
            (Some(_), extra) => Err(LookupError::Ambiguous {
                key: key.to_string(),
                value,
                count: extra + 1,
            }),
            (None, _) => Err(LookupError::NotFound {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// Edges incident to `node` that may be followed in `direction` and pass
    /// `types`, paired with the node on the other end.
    ///
    /// Yields the outgoing list first, then the incoming list, each in
    /// creation order. With [`Direction::Both`] a self-loop is yielded twice,
    /// once per traversable direction. An unknown node yields nothing.
    pub fn relationships_incident<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        types: &'a TypeFilter,
    ) -> Incident<'a> {
        let empty: &'a [EdgeId] = &[];
        let (outgoing, incoming) = match self.node_slot(node) {
            Some(s) => (
                if direction.follows_outgoing() { self.outgoing[s].as_slice() } else { empty },
                if direction.follows_incoming() { self.incoming[s].as_slice() } else { empty },
            ),
            None => (empty, empty),
        };

        Incident {
            store: self,
            node,
            outgoing: outgoing.iter(),
            incoming: incoming.iter(),
            types,
        }
    }

    /// Number of edges incident to `node` in `direction`, any type
    pub fn degree(&self, node: NodeId, direction: Direction) -> usize {
        self.relationships_incident(node, direction, &TypeFilter::Any)
            .count()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in creation order
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// All node ids in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// All edges in creation order
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Remove every node and edge. Ids restart at 1.
    pub fn clear(&mut self) {
        debug!(
            "Clearing graph store ({} nodes, {} edges)",
            self.nodes.len(),
            self.edges.len()
        );
        self.nodes.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }
}

impl Drop for GraphStore {
    fn drop(&mut self) {
        debug!(
            "Releasing graph store ({} nodes, {} edges)",
            self.nodes.len(),
            self.edges.len()
        );
    }
}

/// Iterator over `(edge, other endpoint)` pairs incident to one node.
///
/// Returned by [`GraphStore::relationships_incident`].
#[derive(Debug, Clone)]
pub struct Incident<'a> {
    store: &'a GraphStore,
    node: NodeId,
    outgoing: std::slice::Iter<'a, EdgeId>,
    incoming: std::slice::Iter<'a, EdgeId>,
    types: &'a TypeFilter,
}

impl<'a> Iterator for Incident<'a> {
    type Item = (EdgeId, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (store, node, types) = (self.store, self.node, self.types);
        self.outgoing
            .by_ref()
            .chain(self.incoming.by_ref())
            .filter_map(|&id| store.get_edge(id))
            .filter(|edge| types.matches(&edge.edge_type))
            .find_map(|edge| edge.other_end(node).map(|other| (edge.id, other)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::property::properties;

    fn named(store: &mut GraphStore, name: &str) -> NodeId {
        store.create_node(properties([("Name", name)]))
    }

    #[test]
    fn test_create_and_get_node() {
        let mut store = GraphStore::new();
        let node_id = named(&mut store, "A");

        assert_eq!(store.node_count(), 1);
        assert_eq!(node_id, NodeId::new(1));
        let node = store.get_node(node_id).unwrap();
        assert_eq!(node.id, node_id);
        assert_eq!(node.get_property("Name").unwrap().as_string(), Some("A"));
    }

    #[test]
    fn test_create_and_get_edge() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let b = named(&mut store, "B");

        let edge_id = store
            .create_edge(a, b, "RELATION", properties([("Name", "AB")]))
            .unwrap();

        assert_eq!(store.edge_count(), 1);
        let edge = store.get_edge(edge_id).unwrap();
        assert_eq!(edge.source, a);
        assert_eq!(edge.target, b);
        assert_eq!(edge.edge_type, EdgeType::new("RELATION"));
        assert_eq!(edge.get_property("Name").unwrap().as_string(), Some("AB"));
    }

    #[test]
    fn test_edge_validation() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let invalid_node = NodeId::new(999);

        let result = store.create_edge(invalid_node, a, "RELATION", PropertyMap::new());
        assert_eq!(
            result,
            Err(GraphError::InvalidEndpoint {
                role: Endpoint::Source,
                node: invalid_node
            })
        );

        let result = store.create_edge(a, invalid_node, "RELATION", PropertyMap::new());
        assert_eq!(
            result,
            Err(GraphError::InvalidEndpoint {
                role: Endpoint::Target,
                node: invalid_node
            })
        );

        // Id 0 is never assigned
        let result = store.create_edge(NodeId::new(0), a, "RELATION", PropertyMap::new());
        assert!(matches!(result, Err(GraphError::InvalidEndpoint { .. })));

        // Failed creations leave no trace
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.degree(a, Direction::Both), 0);
    }

    #[test]
    fn test_adjacency_lists() {
        let mut store = GraphStore::new();
        let node1 = named(&mut store, "1");
        let node2 = named(&mut store, "2");
        let node3 = named(&mut store, "3");

        store.create_edge(node1, node2, "KNOWS", PropertyMap::new()).unwrap();
        store.create_edge(node1, node3, "KNOWS", PropertyMap::new()).unwrap();
        store.create_edge(node2, node3, "FOLLOWS", PropertyMap::new()).unwrap();

        // Node1 has 2 outgoing edges
        assert_eq!(store.degree(node1, Direction::Outgoing), 2);

        // Node2 has 1 outgoing, 1 incoming
        assert_eq!(store.degree(node2, Direction::Outgoing), 1);
        assert_eq!(store.degree(node2, Direction::Incoming), 1);

        // Node3 has 0 outgoing, 2 incoming
        assert_eq!(store.degree(node3, Direction::Outgoing), 0);
        assert_eq!(store.degree(node3, Direction::Incoming), 2);
        assert_eq!(store.degree(node3, Direction::Both), 2);
    }

    #[test]
    fn test_relationships_incident_order_and_direction() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let b = named(&mut store, "B");
        let c = named(&mut store, "C");

        let ab = store.create_edge(a, b, "RELATION", PropertyMap::new()).unwrap();
        let ca = store.create_edge(c, a, "RELATION", PropertyMap::new()).unwrap();
        let ac = store.create_edge(a, c, "OTHER", PropertyMap::new()).unwrap();

        let any = TypeFilter::Any;
        let out: Vec<_> = store.relationships_incident(a, Direction::Outgoing, &any).collect();
        assert_eq!(out, vec![(ab, b), (ac, c)]);

        let inc: Vec<_> = store.relationships_incident(a, Direction::Incoming, &any).collect();
        assert_eq!(inc, vec![(ca, c)]);

        let both: Vec<_> = store.relationships_incident(a, Direction::Both, &any).collect();
        assert_eq!(both, vec![(ab, b), (ac, c), (ca, c)]);

        let relation = TypeFilter::only(["RELATION"]);
        let filtered: Vec<_> = store.relationships_incident(a, Direction::Both, &relation).collect();
        assert_eq!(filtered, vec![(ab, b), (ca, c)]);

        // Restartable: a second call sees the same sequence
        let again: Vec<_> = store.relationships_incident(a, Direction::Both, &any).collect();
        assert_eq!(both, again);
    }

    #[test]
    fn test_relationships_incident_self_loop_and_unknown_node() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let aa = store.create_edge(a, a, "RELATION", PropertyMap::new()).unwrap();

        let any = TypeFilter::Any;
        let both: Vec<_> = store.relationships_incident(a, Direction::Both, &any).collect();
        assert_eq!(both, vec![(aa, a), (aa, a)]);
        assert_eq!(store.degree(a, Direction::Outgoing), 1);

        let unknown: Vec<_> = store
            .relationships_incident(NodeId::new(42), Direction::Both, &any)
            .collect();
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_find_node_by_property() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        named(&mut store, "B");
        named(&mut store, "B");

        assert_eq!(store.find_node_by_property("Name", "A"), Ok(a));
        assert_eq!(
            store.find_node_by_property("Name", "Z"),
            Err(LookupError::NotFound {
                key: "Name".to_string(),
                value: "Z".into()
            })
        );
        assert_eq!(
            store.find_node_by_property("Name", "B"),
            Err(LookupError::Ambiguous {
                key: "Name".to_string(),
                value: "B".into(),
                count: 2
            })
        );
        assert!(matches!(
            store.find_node_by_property("Missing", "A"),
            Err(LookupError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_properties() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let b = named(&mut store, "B");
        let ab = store.create_edge(a, b, "RELATION", PropertyMap::new()).unwrap();

        let previous = store.set_node_property(a, "Name", "A2").unwrap();
        assert_eq!(previous, Some(PropertyValue::from("A")));
        store.set_edge_property(ab, "Name", "AB").unwrap();
        assert_eq!(
            store.get_edge(ab).unwrap().get_property("Name"),
            Some(&PropertyValue::from("AB"))
        );

        assert_eq!(
            store.set_node_property(NodeId::new(9), "Name", "X"),
            Err(GraphError::NodeNotFound(NodeId::new(9)))
        );
        assert_eq!(
            store.set_edge_property(EdgeId::new(9), "Name", "X"),
            Err(GraphError::EdgeNotFound(EdgeId::new(9)))
        );
    }

    #[test]
    fn test_all_nodes_creation_order() {
        let mut store = GraphStore::with_capacity(3, 0);
        let ids: Vec<NodeId> = ["A", "B", "C"].iter().map(|n| named(&mut store, n)).collect();

        let listed: Vec<NodeId> = store.node_ids().collect();
        assert_eq!(listed, ids);
        let names: Vec<String> = store
            .all_nodes()
            .map(|n| n.get_property("Name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut store = GraphStore::new();
        let a = named(&mut store, "A");
        let b = named(&mut store, "B");
        store.create_edge(a, b, "RELATION", PropertyMap::new()).unwrap();

        store.clear();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert!(!store.has_node(a));

        // Ids restart after a clear
        assert_eq!(named(&mut store, "C"), NodeId::new(1));
    }
}
