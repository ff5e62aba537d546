//! Paths produced by a traversal
//!
//! A [`Path`] is the immutable `node₀, rel₁, node₁, …, relₙ, nodeₙ` sequence
//! handed to callers and evaluators. The engine itself extends and
//! backtracks a [`WorkingPath`], which also tracks how often each id occurs
//! so uniqueness checks do not rescan the sequence.

use crate::graph::{EdgeId, GraphStore, NodeId};
use rustc_hash::FxHashMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// An ordered alternating sequence of nodes and relationships.
///
/// Invariant: `nodes.len() == relationships.len() + 1`, and relationship `i`
/// connects `nodes[i]` and `nodes[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path {
    nodes: Vec<NodeId>,
    relationships: Vec<EdgeId>,
}

impl Path {
    /// The zero-length path consisting of `start` only
    pub fn single(start: NodeId) -> Self {
        Path {
            nodes: vec![start],
            relationships: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[EdgeId] {
        &self.relationships
    }

    pub fn start_node(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end_node(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn last_relationship(&self) -> Option<EdgeId> {
        self.relationships.last().copied()
    }

    /// Number of relationships in the path
    pub fn length(&self) -> usize {
        self.relationships.len()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_relationship(&self, rel: EdgeId) -> bool {
        self.relationships.contains(&rel)
    }

    /// True if `other` starts with this path and is strictly longer.
    pub fn is_proper_prefix_of(&self, other: &Path) -> bool {
        self.length() < other.length()
            && other.nodes.starts_with(&self.nodes)
            && other.relationships.starts_with(&self.relationships)
    }

    /// Render the path as `A => B => C` using each node's `key` property,
    /// falling back to the node id when the property is missing.
    pub fn render(&self, store: &GraphStore, key: &str) -> String {
        self.nodes
            .iter()
            .map(|&id| {
                store
                    .get_node(id)
                    .and_then(|n| n.get_property(key))
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(" => ")
    }

    fn push(&mut self, rel: EdgeId, node: NodeId) {
        self.relationships.push(rel);
        self.nodes.push(node);
    }

    fn pop(&mut self) -> Option<(EdgeId, NodeId)> {
        if self.relationships.is_empty() {
            return None;
        }
        let rel = self.relationships.pop()?;
        let node = self.nodes.pop()?;
        Some((rel, node))
    }
}

/// Rejects documents that break the node/relationship count invariant, so
/// a deserialized path is as safe to query as one the engine produced.
impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            nodes: Vec<NodeId>,
            relationships: Vec<EdgeId>,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.nodes.len() != raw.relationships.len() + 1 {
            return Err(D::Error::custom(format!(
                "a path of {} relationships needs {} nodes, got {}",
                raw.relationships.len(),
                raw.relationships.len() + 1,
                raw.nodes.len()
            )));
        }
        Ok(Path {
            nodes: raw.nodes,
            relationships: raw.relationships,
        })
    }
}

/// The path under construction during a search, with occurrence counts.
#[derive(Debug, Clone)]
pub(crate) struct WorkingPath {
    path: Path,
    node_counts: FxHashMap<NodeId, u32>,
    rel_counts: FxHashMap<EdgeId, u32>,
}

impl WorkingPath {
    pub(crate) fn new(start: NodeId) -> Self {
        let mut node_counts = FxHashMap::default();
        node_counts.insert(start, 1);
        WorkingPath {
            path: Path::single(start),
            node_counts,
            rel_counts: FxHashMap::default(),
        }
    }

    pub(crate) fn as_path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn end_node(&self) -> NodeId {
        self.path.end_node()
    }

    pub(crate) fn length(&self) -> usize {
        self.path.length()
    }

    pub(crate) fn contains_node(&self, node: NodeId) -> bool {
        self.node_counts.contains_key(&node)
    }

    pub(crate) fn contains_relationship(&self, rel: EdgeId) -> bool {
        self.rel_counts.contains_key(&rel)
    }

    pub(crate) fn push(&mut self, rel: EdgeId, node: NodeId) {
        self.path.push(rel, node);
        *self.node_counts.entry(node).or_insert(0) += 1;
        *self.rel_counts.entry(rel).or_insert(0) += 1;
    }

    /// Undo the last `push`. The start node is never removed.
    pub(crate) fn pop(&mut self) -> Option<(EdgeId, NodeId)> {
        let (rel, node) = self.path.pop()?;
        decrement(&mut self.node_counts, node);
        decrement(&mut self.rel_counts, rel);
        Some((rel, node))
    }

    pub(crate) fn snapshot(&self) -> Path {
        self.path.clone()
    }
}

fn decrement<K: std::hash::Hash + Eq>(counts: &mut FxHashMap<K, u32>, key: K) {
    if let Some(count) = counts.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            counts.remove(&key);
        }
    }
}
