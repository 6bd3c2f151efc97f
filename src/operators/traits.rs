//! Operator traits
//!
//! This module defines the selection strategy trait.

use rand::Rng;

use crate::error::EvaluationError;
use crate::population::candidate::EvaluatedCandidate;

/// Selection strategy trait
///
/// Draws a breeding pool from a scored population. Implementations must only
/// consume entropy from `rng` and must not depend on any other shared state,
/// so that a fixed seed reproduces the same pool.
pub trait SelectionStrategy: Send + Sync {
    /// Select `selection_size` candidates, with replacement
    ///
    /// The result preserves draw order: element `i` is the outcome of the
    /// `i`-th selection event. `selection_size` may exceed the population size.
    fn select<T: Clone, R: Rng>(
        &self,
        population: &[EvaluatedCandidate<T>],
        selection_size: usize,
        rng: &mut R,
    ) -> Result<Vec<T>, EvaluationError>;
}

/// Check the inputs shared by every selection strategy
pub(crate) fn check_selection_inputs<T>(
    population: &[EvaluatedCandidate<T>],
    selection_size: usize,
) -> Result<(), EvaluationError> {
    if population.is_empty() {
        return Err(EvaluationError::EmptyPopulation);
    }
    if selection_size == 0 {
        return Err(EvaluationError::InvalidSelectionSize(selection_size));
    }
    Ok(())
}
