//! Nikolaus
//!
//! Depth-first path enumeration over an in-memory property graph.
//!
//! # Architecture
//!
//! - [`graph`]: nodes and directed, typed relationships with properties,
//!   stored in arenas with creation-ordered adjacency lists
//! - [`traversal`]: lazy DFS path enumeration, configured by relationship
//!   types, direction, a uniqueness policy and evaluators
//! - [`config`]: YAML/JSON traversal configuration
//! - [`fixture`]: small named graphs, including the "house of Nikolaus"
//!
//! ## Example Usage
//!
//! ```rust
//! use nikolaus::fixture::GraphFixture;
//! use nikolaus::graph::Direction;
//! use nikolaus::traversal::{Evaluator, TraversalDescription, Uniqueness};
//!
//! let store = GraphFixture::house().build().unwrap();
//!
//! // Every way to draw the house in one stroke without lifting the pen
//! let description = TraversalDescription::new()
//!     .relationships("RELATION")
//!     .direction(Direction::Both)
//!     .uniqueness(Uniqueness::RelationshipPath)
//!     .evaluator(Evaluator::AtLength(8));
//!
//! let mut total = 0;
//! for start in store.node_ids() {
//!     for path in description.traverse(&store, start).unwrap() {
//!         let path = path.unwrap();
//!         assert_eq!(path.length(), 8);
//!         total += 1;
//!     }
//! }
//! assert_eq!(total, 88);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod fixture;
pub mod graph;
pub mod traversal;

// Re-export main types for convenience
pub use graph::{
    Direction, Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, LookupError, Node,
    NodeId, PropertyMap, PropertyValue, TypeFilter,
};

pub use traversal::{
    traverse, Evaluation, Evaluator, EvaluatorError, Path, TraversalDescription,
    TraversalError, TraversalResult, TraversalStats, Traverser, Uniqueness,
};

pub use config::{ConfigError, EvaluatorConfig, TraversalConfig};
pub use fixture::{FixtureError, GraphFixture};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
