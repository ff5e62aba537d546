//! Run one independent traversal per node in the graph.

use super::engine::TraversalDescription;
use super::error::TraversalResult;
use super::path::Path;
use crate::graph::{GraphStore, NodeId};
use rayon::prelude::*;
use tracing::debug;

/// Paths accepted from one start node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPaths {
    pub start: NodeId,
    pub paths: Vec<Path>,
}

fn collect_from(
    store: &GraphStore,
    description: &TraversalDescription,
    start: NodeId,
) -> TraversalResult<StartPaths> {
    let paths = description
        .traverse(store, start)?
        .collect::<TraversalResult<Vec<Path>>>()?;
    Ok(StartPaths { start, paths })
}

/// Traverse from every node in creation order, one after another.
///
/// Each start gets a fresh uniqueness scope. Stops at the first error.
pub fn paths_from_all_nodes(
    store: &GraphStore,
    description: &TraversalDescription,
) -> TraversalResult<Vec<StartPaths>> {
    store
        .node_ids()
        .map(|start| collect_from(store, description, start))
        .collect()
}

/// Same as [`paths_from_all_nodes`], with the per-node traversals spread
/// over the rayon pool. Results stay in creation order.
pub fn par_paths_from_all_nodes(
    store: &GraphStore,
    description: &TraversalDescription,
) -> TraversalResult<Vec<StartPaths>> {
    let starts: Vec<NodeId> = store.node_ids().collect();
    debug!("Traversing from {} start nodes in parallel", starts.len());
    starts
        .par_iter()
        .map(|&start| collect_from(store, description, start))
        .collect()
}

/// Count accepted paths from every node without keeping them.
pub fn count_paths_from_all_nodes(
    store: &GraphStore,
    description: &TraversalDescription,
) -> TraversalResult<usize> {
    let mut total = 0;
    for start in store.node_ids() {
        for path in description.traverse(store, start)? {
            path?;
            total += 1;
        }
    }
    Ok(total)
}
