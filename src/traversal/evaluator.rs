//! Evaluators decide, for every path the engine reaches, whether the path
//! belongs in the result and whether it is worth extending.
//!
//! Built-in strategies are plain enum variants; arbitrary logic goes through
//! [`Evaluator::Custom`], which wraps a closure.

use super::path::Path;
use crate::graph::NodeId;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The decision an evaluator makes about one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluation {
    IncludeAndContinue,
    IncludeAndPrune,
    ExcludeAndContinue,
    ExcludeAndPrune,
}

impl Evaluation {
    pub fn of(include: bool, continues: bool) -> Self {
        match (include, continues) {
            (true, true) => Evaluation::IncludeAndContinue,
            (true, false) => Evaluation::IncludeAndPrune,
            (false, true) => Evaluation::ExcludeAndContinue,
            (false, false) => Evaluation::ExcludeAndPrune,
        }
    }

    /// Whether the path is emitted
    pub fn includes(self) -> bool {
        matches!(self, Evaluation::IncludeAndContinue | Evaluation::IncludeAndPrune)
    }

    /// Whether the path is expanded further
    pub fn continues(self) -> bool {
        matches!(self, Evaluation::IncludeAndContinue | Evaluation::ExcludeAndContinue)
    }
}

/// A failure raised from inside an evaluator. Aborts the traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Evaluator failed: {message}")]
pub struct EvaluatorError {
    pub message: String,
}

impl EvaluatorError {
    pub fn new(message: impl Into<String>) -> Self {
        EvaluatorError {
            message: message.into(),
        }
    }
}

/// Signature of a custom evaluator
pub type EvaluatorFn = dyn Fn(&Path) -> Result<Evaluation, EvaluatorError> + Send + Sync;

#[derive(Clone)]
pub enum Evaluator {
    /// Include every path, never prune
    All,
    /// Include every path except the zero-length start path
    ExcludeStartPosition,
    /// Include paths of exactly `k` relationships and stop there
    AtLength(usize),
    /// Include paths of up to `k` relationships, stop at `k`
    ToLength(usize),
    /// Include paths of at least `k` relationships
    FromLength(usize),
    /// Include paths whose length lies in `min..=max`, stop at `max`
    LengthBetween { min: usize, max: usize },
    /// Include paths ending at one of the given nodes
    EndNodeIn(Vec<NodeId>),
    Custom(Arc<EvaluatorFn>),
}

impl Evaluator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Path) -> Result<Evaluation, EvaluatorError> + Send + Sync + 'static,
    {
        Evaluator::Custom(Arc::new(f))
    }

    pub fn evaluate(&self, path: &Path) -> Result<Evaluation, EvaluatorError> {
        let length = path.length();
        let evaluation = match self {
            Evaluator::All => Evaluation::IncludeAndContinue,
            Evaluator::ExcludeStartPosition => Evaluation::of(length > 0, true),
            Evaluator::AtLength(k) => match length.cmp(k) {
                std::cmp::Ordering::Less => Evaluation::ExcludeAndContinue,
                std::cmp::Ordering::Equal => Evaluation::IncludeAndPrune,
                std::cmp::Ordering::Greater => Evaluation::ExcludeAndPrune,
            },
            Evaluator::ToLength(k) => match length.cmp(k) {
                std::cmp::Ordering::Less => Evaluation::IncludeAndContinue,
                std::cmp::Ordering::Equal => Evaluation::IncludeAndPrune,
                std::cmp::Ordering::Greater => Evaluation::ExcludeAndPrune,
            },
            Evaluator::FromLength(k) => Evaluation::of(length >= *k, true),
            Evaluator::LengthBetween { min, max } => {
                if length > *max {
                    Evaluation::ExcludeAndPrune
                } else {
                    Evaluation::of(length >= *min, length < *max)
                }
            }
            Evaluator::EndNodeIn(nodes) => Evaluation::of(nodes.contains(&path.end_node()), true),
            Evaluator::Custom(f) => return f(path),
        };
        Ok(evaluation)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluator::All => write!(f, "All"),
            Evaluator::ExcludeStartPosition => write!(f, "ExcludeStartPosition"),
            Evaluator::AtLength(k) => write!(f, "AtLength({})", k),
            Evaluator::ToLength(k) => write!(f, "ToLength({})", k),
            Evaluator::FromLength(k) => write!(f, "FromLength({})", k),
            Evaluator::LengthBetween { min, max } => {
                write!(f, "LengthBetween {{ min: {}, max: {} }}", min, max)
            }
            Evaluator::EndNodeIn(nodes) => write!(f, "EndNodeIn({:?})", nodes),
            Evaluator::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Combine several evaluators: include only if all include, continue only
/// if all continue. Each evaluator runs exactly once; the first error wins.
pub(crate) fn evaluate_all(
    evaluators: &[Evaluator],
    path: &Path,
) -> Result<Evaluation, EvaluatorError> {
    let mut include = true;
    let mut continues = true;
    for evaluator in evaluators {
        let evaluation = evaluator.evaluate(path)?;
        include &= evaluation.includes();
        continues &= evaluation.continues();
    }
    Ok(Evaluation::of(include, continues))
}
