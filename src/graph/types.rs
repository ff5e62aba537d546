//! Core type definitions for the property graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Unique identifier for an edge (relationship)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

/// Edge type (relationship type, e.g., "RELATION", "KNOWS")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeType(String);

impl EdgeType {
    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        EdgeType(s)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}

/// Which stored direction of an edge may be followed from a node.
///
/// Edges are always stored directed (source -> target). `Outgoing` follows
/// edges whose source is the current node, `Incoming` edges whose target is
/// the current node, `Both` follows either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

impl Direction {
    pub(crate) fn follows_outgoing(self) -> bool {
        matches!(self, Direction::Outgoing | Direction::Both)
    }

    pub(crate) fn follows_incoming(self) -> bool {
        matches!(self, Direction::Incoming | Direction::Both)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
            Direction::Both => "both",
        };
        write!(f, "{}", s)
    }
}

/// Restricts which edge types a traversal may expand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    /// Every edge type is traversable
    #[default]
    Any,
    /// Only the listed edge types are traversable
    Only(Vec<EdgeType>),
}

impl TypeFilter {
    pub fn only<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EdgeType>,
    {
        TypeFilter::Only(types.into_iter().map(Into::into).collect())
    }

    /// Add a type to the filter. `Any` becomes `Only([edge_type])`.
    pub fn with(self, edge_type: impl Into<EdgeType>) -> Self {
        let edge_type = edge_type.into();
        match self {
            TypeFilter::Any => TypeFilter::Only(vec![edge_type]),
            TypeFilter::Only(mut types) => {
                if !types.contains(&edge_type) {
                    types.push(edge_type);
                }
                TypeFilter::Only(types)
            }
        }
    }

    pub fn matches(&self, edge_type: &EdgeType) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Only(types) => types.contains(edge_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "NodeId(42)");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(99);
        assert_eq!(id.as_u64(), 99);
        assert_eq!(format!("{}", id), "EdgeId(99)");
    }

    #[test]
    fn test_edge_type() {
        let edge_type = EdgeType::new("RELATION");
        assert_eq!(edge_type.as_str(), "RELATION");
        assert_eq!(format!("{}", edge_type), "RELATION");
    }

    #[test]
    fn test_direction_serde() {
        let d: Direction = serde_json::from_str("\"outgoing\"").unwrap();
        assert_eq!(d, Direction::Outgoing);
        assert_eq!(serde_json::to_string(&Direction::Both).unwrap(), "\"both\"");
    }

    #[test]
    fn test_type_filter() {
        let any = TypeFilter::Any;
        assert!(any.matches(&EdgeType::new("KNOWS")));

        let only = TypeFilter::Any.with("RELATION").with("RELATION");
        assert_eq!(only, TypeFilter::only(["RELATION"]));
        assert!(only.matches(&EdgeType::new("RELATION")));
        assert!(!only.matches(&EdgeType::new("KNOWS")));
    }

    #[test]
    fn test_id_ordering() {
        let id1 = NodeId::new(1);
        let id2 = NodeId::new(2);
        assert!(id1 < id2);
    }
}
