//! Depth-first traversal engine
//!
//! [`Traverser`] walks the graph with an explicit stack instead of
//! recursion: one frame per path prefix, each frame holding the incident
//! relationships of that prefix's end node that have not been tried yet.
//! Work only happens inside [`Iterator::next`], so a consumer that stops
//! pulling results stops the search.

use super::error::{TraversalError, TraversalResult};
use super::evaluator::{evaluate_all, Evaluator, EvaluatorError};
use super::path::{Path, WorkingPath};
use super::uniqueness::{Uniqueness, UniquenessFilter};
use crate::graph::{Direction, EdgeType, GraphStore, Incident, NodeId, TypeFilter};
use serde::Serialize;
use std::borrow::Cow;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

/// Reusable description of a traversal: which relationships to follow,
/// in which direction, under which uniqueness policy, judged by which
/// evaluators.
///
/// Defaults: any relationship type, both directions, `NodeGlobal`
/// uniqueness, and no evaluators (every reachable path is included).
#[derive(Debug, Clone, Default)]
pub struct TraversalDescription {
    types: TypeFilter,
    direction: Direction,
    uniqueness: Uniqueness,
    evaluators: Vec<Evaluator>,
}

impl TraversalDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict traversal to `edge_type`. May be called repeatedly to
    /// allow several types.
    pub fn relationships(mut self, edge_type: impl Into<EdgeType>) -> Self {
        self.types = self.types.with(edge_type);
        self
    }

    /// Replace the relationship type filter.
    pub fn types(mut self, types: TypeFilter) -> Self {
        self.types = types;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Add an evaluator. All evaluators must include a path for it to be
    /// returned, and all must continue for it to be expanded.
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.types
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn get_uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    pub fn evaluators(&self) -> &[Evaluator] {
        &self.evaluators
    }

    /// Start a traversal from `start`.
    ///
    /// Fails up front if `start` is not in the store; evaluator failures
    /// surface later, as an `Err` item of the returned iterator.
    pub fn traverse<'a>(
        &'a self,
        store: &'a GraphStore,
        start: NodeId,
    ) -> TraversalResult<Traverser<'a>> {
        self.traverse_from(store, [start])
    }

    /// Start one traversal over several start nodes, searched in order.
    ///
    /// Global uniqueness state is shared by all of them, so with
    /// `NodeGlobal` a node reached from the first start is not revisited
    /// from later ones. Use one `traverse` call per start for independent
    /// searches.
    pub fn traverse_from<'a, I>(&'a self, store: &'a GraphStore, starts: I) -> TraversalResult<Traverser<'a>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        Traverser::new(
            store,
            starts.into_iter().collect(),
            &self.types,
            self.direction,
            self.uniqueness,
            Cow::Borrowed(&self.evaluators),
        )
    }
}

/// Traverse from a single start node with a single evaluator.
pub fn traverse<'a>(
    store: &'a GraphStore,
    start: NodeId,
    types: &'a TypeFilter,
    direction: Direction,
    uniqueness: Uniqueness,
    evaluator: Evaluator,
) -> TraversalResult<Traverser<'a>> {
    Traverser::new(
        store,
        vec![start],
        types,
        direction,
        uniqueness,
        Cow::Owned(vec![evaluator]),
    )
}

/// Counters describing the work a traversal has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    /// Path states handed to the evaluators, the start path included
    pub paths_evaluated: u64,
    /// Paths emitted to the consumer
    pub paths_returned: u64,
    /// Extensions accepted by the uniqueness policy
    pub relationships_traversed: u64,
    /// Path states not expanded because an evaluator pruned them
    pub branches_pruned: u64,
}

/// Lazy sequence of accepted paths.
///
/// Yields `Ok(path)` for every included path in depth-first order. If an
/// evaluator fails, yields that error once and then ends; paths already
/// yielded stay valid.
pub struct Traverser<'a> {
    store: &'a GraphStore,
    types: &'a TypeFilter,
    direction: Direction,
    evaluators: Cow<'a, [Evaluator]>,
    uniqueness: UniquenessFilter,
    pending_starts: std::vec::IntoIter<NodeId>,
    /// The path being explored, None between start nodes
    path: Option<WorkingPath>,
    /// Frame `i` holds the untried extensions of the path prefix of length `i`
    stack: Vec<Incident<'a>>,
    stats: TraversalStats,
    finished: bool,
}

impl<'a> Traverser<'a> {
    fn new(
        store: &'a GraphStore,
        starts: Vec<NodeId>,
        types: &'a TypeFilter,
        direction: Direction,
        uniqueness: Uniqueness,
        evaluators: Cow<'a, [Evaluator]>,
    ) -> TraversalResult<Self> {
        if let Some(&missing) = starts.iter().find(|&&id| !store.has_node(id)) {
            return Err(TraversalError::StartNodeNotFound(missing));
        }

        debug!(
            "Starting traversal from {:?} ({} direction, {} uniqueness, {} evaluators)",
            starts,
            direction,
            uniqueness,
            evaluators.len()
        );

        Ok(Traverser {
            store,
            types,
            direction,
            evaluators,
            uniqueness: UniquenessFilter::new(uniqueness),
            pending_starts: starts.into_iter(),
            path: None,
            stack: Vec::new(),
            stats: TraversalStats::default(),
            finished: false,
        })
    }

    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// Evaluate the current path, emit it if included, and either open a
    /// frame for its extensions or backtrack immediately.
    fn visit(&mut self) -> Result<Option<Path>, EvaluatorError> {
        let store = self.store;
        let types = self.types;
        let path = match self.path.as_mut() {
            Some(path) => path,
            None => return Ok(None),
        };

        self.stats.paths_evaluated += 1;
        let evaluation = evaluate_all(&self.evaluators, path.as_path())?;

        let emitted = if evaluation.includes() {
            self.stats.paths_returned += 1;
            Some(path.snapshot())
        } else {
            None
        };

        if evaluation.continues() {
            self.stack
                .push(store.relationships_incident(path.end_node(), self.direction, types));
        } else {
            self.stats.branches_pruned += 1;
            trace!("Pruned branch at length {}", path.length());
            if path.pop().is_none() {
                self.path = None;
            }
        }

        Ok(emitted)
    }

    fn fail(&mut self, error: EvaluatorError) -> TraversalError {
        warn!("Traversal aborted: {}", error);
        self.stack.clear();
        self.path = None;
        self.finished = true;
        TraversalError::Evaluator(error)
    }

    fn finish(&mut self) {
        self.finished = true;
        debug!(
            "Traversal finished: {} paths returned, {} evaluated, {} relationships traversed",
            self.stats.paths_returned, self.stats.paths_evaluated, self.stats.relationships_traversed
        );
    }
}

impl<'a> Iterator for Traverser<'a> {
    type Item = TraversalResult<Path>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.path.is_none() {
                let start = match self.pending_starts.next() {
                    Some(start) => start,
                    None => {
                        self.finish();
                        return None;
                    }
                };
                if !self.uniqueness.admit_start(start) {
                    continue;
                }
                self.path = Some(WorkingPath::new(start));
            } else {
                let candidate = {
                    let path = match self.path.as_ref() {
                        Some(path) => path,
                        None => continue,
                    };
                    let uniqueness = &mut self.uniqueness;
                    match self.stack.last_mut() {
                        Some(frame) => frame.find(|&(rel, node)| uniqueness.allows(path, rel, node)),
                        None => None,
                    }
                };

                match candidate {
                    Some((rel, node)) => {
                        self.stats.relationships_traversed += 1;
                        if let Some(path) = self.path.as_mut() {
                            path.push(rel, node);
                        }
                    }
                    None => {
                        // Frame exhausted: drop it and undo the extension
                        // that created its prefix.
                        self.stack.pop();
                        let at_start = self.path.as_mut().map_or(true, |p| p.pop().is_none());
                        if at_start {
                            self.path = None;
                        }
                        continue;
                    }
                }
            }

            match self.visit() {
                Ok(Some(path)) => return Some(Ok(path)),
                Ok(None) => continue,
                Err(error) => return Some(Err(self.fail(error))),
            }
        }
    }
}

impl<'a> FusedIterator for Traverser<'a> {}
