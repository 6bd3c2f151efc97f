//! Scored candidate type
//!
//! This module provides the `EvaluatedCandidate` type that pairs a candidate with its fitness.

use serde::{Deserialize, Serialize};

/// A candidate paired with its fitness score
///
/// Higher fitness is better. Candidates are deliberately not comparable for
/// equality: two candidates may share a score, and selection identifies them
/// by position in the population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluatedCandidate<T> {
    candidate: T,
    fitness: f64,
}

impl<T> EvaluatedCandidate<T> {
    /// Pair a candidate with its fitness
    pub fn new(candidate: T, fitness: f64) -> Self {
        Self { candidate, fitness }
    }

    /// Get a reference to the candidate
    pub fn candidate(&self) -> &T {
        &self.candidate
    }

    /// The fitness score
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Take the candidate out, dropping the score
    pub fn into_candidate(self) -> T {
        self.candidate
    }

    /// Check if this candidate scores strictly higher than another
    ///
    /// NaN scores are never fitter than anything, nor is anything fitter than them.
    pub fn is_fitter_than(&self, other: &Self) -> bool {
        self.fitness > other.fitness
    }
}
