//! Traversal error types

use super::evaluator::EvaluatorError;
use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised by the traversal engine.
///
/// `StartNodeNotFound` is a setup error returned before any search work;
/// `Evaluator` is a search-time error that ends an in-flight traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    #[error("Start node {0} not found")]
    StartNodeNotFound(NodeId),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

pub type TraversalResult<T> = Result<T, TraversalError>;
