//! Path enumeration over a [`GraphStore`](crate::graph::GraphStore)
//!
//! - [`Path`]: the node/relationship sequences the engine produces
//! - [`Uniqueness`]: which repeats a path (or a whole traversal) tolerates
//! - [`Evaluator`]: per-path include/prune decisions
//! - [`TraversalDescription`] / [`Traverser`]: the depth-first engine
//! - [`batch`]: one traversal per node, sequential or on rayon

pub mod batch;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod path;
pub mod uniqueness;

pub use batch::{count_paths_from_all_nodes, paths_from_all_nodes, par_paths_from_all_nodes, StartPaths};
pub use engine::{traverse, TraversalDescription, TraversalStats, Traverser};
pub use error::{TraversalError, TraversalResult};
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, EvaluatorFn};
pub use path::Path;
pub use uniqueness::Uniqueness;
