use crate::matrix::{Cost, Node, NumNodes};
use std::error::Error;
use thiserror::Error;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("at least 3 destinations are required, got {0}")]
    TooFewDestinations(NumNodes),

    #[error("at most {max} destinations are supported, got {0}", max = crate::matrix::MAX_DESTINATIONS)]
    TooManyDestinations(NumNodes),

    #[error("expected a cost matrix for {expected} destinations, got {actual}")]
    DimensionMismatch { expected: NumNodes, actual: NumNodes },

    #[error("cost from {from} to {to} must be finite and non-negative, got {cost}")]
    InvalidCost { from: Node, to: Node, cost: Cost },

    #[error("diagonal entry of destination {0} must be infinite")]
    FiniteDiagonal(Node),

    #[error("tour is not a permutation of the destinations 1..={0}")]
    NotAPermutation(NumNodes),

    #[error("search interrupted after {iterations} iterations")]
    Interrupted { iterations: usize },
}
