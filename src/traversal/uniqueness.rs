//! Uniqueness policies
//!
//! A policy decides whether a candidate `(relationship, node)` extension of
//! the current path is legal. Path-scoped policies look only at the path;
//! global policies remember every id accepted so far in the same traversal.

use super::path::WorkingPath;
use crate::graph::{EdgeId, NodeId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Uniqueness {
    /// Any extension is allowed. Only safe with an evaluator that prunes.
    None,
    /// A node may appear at most once per path
    NodePath,
    /// A relationship may appear at most once per path
    RelationshipPath,
    /// A node may be reached at most once per traversal
    #[default]
    NodeGlobal,
    /// A relationship may be followed at most once per traversal
    RelationshipGlobal,
}

impl fmt::Display for Uniqueness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Uniqueness::None => "none",
            Uniqueness::NodePath => "node_path",
            Uniqueness::RelationshipPath => "relationship_path",
            Uniqueness::NodeGlobal => "node_global",
            Uniqueness::RelationshipGlobal => "relationship_global",
        };
        write!(f, "{}", s)
    }
}

/// A policy plus the traversal-scoped visited sets global policies need.
#[derive(Debug, Clone)]
pub(crate) struct UniquenessFilter {
    policy: Uniqueness,
    visited_nodes: FxHashSet<NodeId>,
    visited_rels: FxHashSet<EdgeId>,
}

impl UniquenessFilter {
    pub(crate) fn new(policy: Uniqueness) -> Self {
        UniquenessFilter {
            policy,
            visited_nodes: FxHashSet::default(),
            visited_rels: FxHashSet::default(),
        }
    }

    /// Register a start node. Returns false if a global node policy has
    /// already seen it, in which case that start yields nothing.
    pub(crate) fn admit_start(&mut self, start: NodeId) -> bool {
        match self.policy {
            Uniqueness::NodeGlobal => self.visited_nodes.insert(start),
            _ => true,
        }
    }

    /// Whether `path` may be extended by `(rel, node)`.
    ///
    /// Global policies mark the id as visited when they allow it, so a
    /// second candidate with the same id is rejected for the rest of the
    /// traversal even after the first branch has been backtracked.
    pub(crate) fn allows(&mut self, path: &WorkingPath, rel: EdgeId, node: NodeId) -> bool {
        match self.policy {
            Uniqueness::None => true,
            Uniqueness::NodePath => !path.contains_node(node),
            Uniqueness::RelationshipPath => !path.contains_relationship(rel),
            Uniqueness::NodeGlobal => self.visited_nodes.insert(node),
            Uniqueness::RelationshipGlobal => self.visited_rels.insert(rel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_1_2_via_10() -> WorkingPath {
        let mut wp = WorkingPath::new(NodeId::new(1));
        wp.push(EdgeId::new(10), NodeId::new(2));
        wp
    }

    #[test]
    fn test_none_allows_everything() {
        let mut filter = UniquenessFilter::new(Uniqueness::None);
        let wp = path_1_2_via_10();
        assert!(filter.allows(&wp, EdgeId::new(10), NodeId::new(1)));
        assert!(filter.allows(&wp, EdgeId::new(10), NodeId::new(1)));
    }

    #[test]
    fn test_relationship_path() {
        let mut filter = UniquenessFilter::new(Uniqueness::RelationshipPath);
        let wp = path_1_2_via_10();
        assert!(!filter.allows(&wp, EdgeId::new(10), NodeId::new(1)));
        // Revisiting a node over a fresh relationship is fine
        assert!(filter.allows(&wp, EdgeId::new(11), NodeId::new(1)));
        assert!(filter.allows(&wp, EdgeId::new(11), NodeId::new(1)));
    }

    #[test]
    fn test_node_path() {
        let mut filter = UniquenessFilter::new(Uniqueness::NodePath);
        let wp = path_1_2_via_10();
        assert!(!filter.allows(&wp, EdgeId::new(11), NodeId::new(1)));
        assert!(!filter.allows(&wp, EdgeId::new(12), NodeId::new(2)));
        assert!(filter.allows(&wp, EdgeId::new(12), NodeId::new(3)));
    }

    #[test]
    fn test_node_global_remembers_across_branches() {
        let mut filter = UniquenessFilter::new(Uniqueness::NodeGlobal);
        assert!(filter.admit_start(NodeId::new(1)));
        let wp = WorkingPath::new(NodeId::new(1));

        assert!(!filter.allows(&wp, EdgeId::new(10), NodeId::new(1)));
        assert!(filter.allows(&wp, EdgeId::new(10), NodeId::new(2)));
        assert!(!filter.allows(&wp, EdgeId::new(11), NodeId::new(2)));

        assert!(!filter.admit_start(NodeId::new(2)));
    }

    #[test]
    fn test_relationship_global() {
        let mut filter = UniquenessFilter::new(Uniqueness::RelationshipGlobal);
        assert!(filter.admit_start(NodeId::new(1)));
        let wp = WorkingPath::new(NodeId::new(1));

        assert!(filter.allows(&wp, EdgeId::new(10), NodeId::new(2)));
        assert!(!filter.allows(&wp, EdgeId::new(10), NodeId::new(1)));
        assert!(filter.admit_start(NodeId::new(1)));
    }

    #[test]
    fn test_defaults_and_serde() {
        assert_eq!(Uniqueness::default(), Uniqueness::NodeGlobal);

        let u: Uniqueness = serde_json::from_str("\"relationship_path\"").unwrap();
        assert_eq!(u, Uniqueness::RelationshipPath);
        assert_eq!(u.to_string(), "relationship_path");
    }
}
