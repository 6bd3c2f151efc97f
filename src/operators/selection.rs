//! Selection operators
//!
//! This module provides probabilistic tournament selection.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, OperatorError};
use crate::operators::traits::{check_selection_inputs, SelectionStrategy};
use crate::population::candidate::EvaluatedCandidate;

/// Serializable settings for [`TournamentSelection`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Probability that the fitter of the two contestants wins, in (0.5, 1.0)
    pub selection_probability: f64,
}

/// Probabilistic binary tournament selection
///
/// Each selection event picks two candidates uniformly at random (with
/// replacement) and returns the fitter one with probability
/// `selection_probability`, otherwise the weaker one.
///
/// Every event consumes exactly three draws from the rng, in this order: the
/// first index, the second index, then a uniform `f64` in `[0, 1)`.
///
/// "Fitter" means strictly greater fitness. When the scores tie (or either is
/// NaN) the first contestant counts as the fitter one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TournamentConfig", into = "TournamentConfig")]
pub struct TournamentSelection {
    selection_probability: f64,
}

impl TournamentSelection {
    /// Create a new tournament selection
    ///
    /// Fails unless `0.5 < selection_probability < 1.0`. Lower values would
    /// favour weaker candidates, and `1.0` removes all chance for them.
    pub fn new(selection_probability: f64) -> Result<Self, OperatorError> {
        // Negated so that NaN is rejected too
        if !(selection_probability > 0.5 && selection_probability < 1.0) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "selection probability must be greater than 0.5 and less than 1.0, got {}",
                selection_probability
            )));
        }
        Ok(Self {
            selection_probability,
        })
    }

    /// Probability that the fitter contestant wins a tournament
    pub fn selection_probability(&self) -> f64 {
        self.selection_probability
    }

    /// Run a single tournament between two already-drawn contestants
    ///
    /// Consumes one `f64` from the rng.
    pub fn contest<'a, T, R: Rng>(
        &self,
        first: &'a EvaluatedCandidate<T>,
        second: &'a EvaluatedCandidate<T>,
        rng: &mut R,
    ) -> &'a EvaluatedCandidate<T> {
        let value: f64 = rng.gen();
        let (fitter, weaker) = if second.is_fitter_than(first) {
            (second, first)
        } else {
            (first, second)
        };
        if value < self.selection_probability {
            fitter
        } else {
            weaker
        }
    }
}

impl TryFrom<TournamentConfig> for TournamentSelection {
    type Error = OperatorError;

    fn try_from(config: TournamentConfig) -> Result<Self, Self::Error> {
        Self::new(config.selection_probability)
    }
}

impl From<TournamentSelection> for TournamentConfig {
    fn from(selection: TournamentSelection) -> Self {
        Self {
            selection_probability: selection.selection_probability,
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select<T: Clone, R: Rng>(
        &self,
        population: &[EvaluatedCandidate<T>],
        selection_size: usize,
        rng: &mut R,
    ) -> Result<Vec<T>, EvaluationError> {
        check_selection_inputs(population, selection_size)?;
        debug!(
            "Tournament selection of {} from {} candidates (p = {})",
            selection_size,
            population.len(),
            self.selection_probability
        );

        let mut selection = Vec::with_capacity(selection_size);
        for _ in 0..selection_size {
            let first = &population[rng.gen_range(0..population.len())];
            let second = &population[rng.gen_range(0..population.len())];
            selection.push(self.contest(first, second, rng).candidate().clone());
        }
        Ok(selection)
    }
}
