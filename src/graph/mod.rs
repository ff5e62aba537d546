//! Core property graph implementation
//!
//! This module implements the property graph data model with:
//! - Nodes with properties
//! - Directed, typed edges with properties
//! - Multiple edges between the same nodes
//! - In-memory arenas with creation-ordered adjacency lists

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use property::{properties, PropertyMap, PropertyValue};
pub use store::{Endpoint, GraphError, GraphResult, GraphStore, Incident, LookupError};
pub use types::{Direction, EdgeId, EdgeType, NodeId, TypeFilter};
