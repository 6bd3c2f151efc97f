//! Population type
//!
//! This module provides the non-empty, scored Population container.

use std::ops::Deref;

use log::{debug, warn};
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::EvaluationError;
use crate::fitness::traits::FitnessFunction;
use crate::operators::traits::SelectionStrategy;
use crate::population::candidate::EvaluatedCandidate;

/// A non-empty population of scored candidates
///
/// Order carries no meaning for selection, but it is fixed for the lifetime of
/// the population.
#[derive(Clone, Debug)]
pub struct Population<T> {
    candidates: Vec<EvaluatedCandidate<T>>,
}

impl<T> Population<T> {
    /// Create a population from already-scored candidates
    pub fn new(candidates: Vec<EvaluatedCandidate<T>>) -> Result<Self, EvaluationError> {
        if candidates.is_empty() {
            return Err(EvaluationError::EmptyPopulation);
        }
        for (index, c) in candidates.iter().enumerate() {
            if c.fitness().is_nan() {
                warn!("Candidate {} has NaN fitness", index);
            }
        }
        Ok(Self { candidates })
    }

    /// Score every candidate in order (sequential)
    ///
    /// Fails on the first candidate the fitness function rejects.
    pub fn evaluate<Fit>(candidates: Vec<T>, fitness: &Fit) -> Result<Self, EvaluationError>
    where
        Fit: FitnessFunction<T>,
    {
        debug!("Evaluating {} candidates", candidates.len());
        let scored = candidates
            .into_iter()
            .map(|candidate| {
                let score = fitness.evaluate(&candidate)?;
                Ok(EvaluatedCandidate::new(candidate, score))
            })
            .collect::<Result<Vec<_>, EvaluationError>>()?;
        Self::new(scored)
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get a candidate by index
    pub fn get(&self, index: usize) -> Option<&EvaluatedCandidate<T>> {
        self.candidates.get(index)
    }

    /// Get an iterator over the candidates
    pub fn iter(&self) -> impl Iterator<Item = &EvaluatedCandidate<T>> {
        self.candidates.iter()
    }

    /// The scored candidates as a slice
    pub fn as_slice(&self) -> &[EvaluatedCandidate<T>] {
        &self.candidates
    }

    /// Take the scored candidates out of this population
    pub fn into_candidates(self) -> Vec<EvaluatedCandidate<T>> {
        self.candidates
    }

    /// Get the best candidate (by fitness, first wins ties)
    ///
    /// NaN scores are skipped; the first candidate is returned only when every
    /// score is NaN.
    pub fn best(&self) -> &EvaluatedCandidate<T> {
        let mut scored = self.candidates.iter().filter(|c| !c.fitness().is_nan());
        match scored.next() {
            Some(first) => scored.fold(first, |best, c| {
                if c.is_fitter_than(best) {
                    c
                } else {
                    best
                }
            }),
            None => &self.candidates[0],
        }
    }

    /// Draw a breeding pool of `selection_size` candidates with the given strategy
    pub fn select<S, R>(
        &self,
        strategy: &S,
        selection_size: usize,
        rng: &mut R,
    ) -> Result<Vec<T>, EvaluationError>
    where
        S: SelectionStrategy,
        T: Clone,
        R: Rng,
    {
        strategy.select(&self.candidates, selection_size, rng)
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl<T: Send + Sync> Population<T> {
    /// Score every candidate across threads, preserving order
    pub fn evaluate_parallel<Fit>(
        candidates: Vec<T>,
        fitness: &Fit,
    ) -> Result<Self, EvaluationError>
    where
        Fit: FitnessFunction<T> + Sync,
    {
        debug!("Evaluating {} candidates in parallel", candidates.len());
        let scored = candidates
            .into_par_iter()
            .map(|candidate| {
                let score = fitness.evaluate(&candidate)?;
                Ok(EvaluatedCandidate::new(candidate, score))
            })
            .collect::<Result<Vec<_>, EvaluationError>>()?;
        Self::new(scored)
    }
}

impl<T> Deref for Population<T> {
    type Target = [EvaluatedCandidate<T>];

    fn deref(&self) -> &Self::Target {
        &self.candidates
    }
}

impl<'a, T> IntoIterator for &'a Population<T> {
    type Item = &'a EvaluatedCandidate<T>;
    type IntoIter = std::slice::Iter<'a, EvaluatedCandidate<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
