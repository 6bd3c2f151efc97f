//! Fitness traits
//!
//! This module defines the interface the evolutionary loop uses to score candidates.

use crate::error::EvaluationError;

/// Fitness evaluation trait
///
/// Defines how to score a candidate (higher = better). Any closure of the form
/// `Fn(&T) -> Result<f64, EvaluationError>` is a fitness function.
pub trait FitnessFunction<T> {
    /// Evaluate fitness
    fn evaluate(&self, candidate: &T) -> Result<f64, EvaluationError>;
}

impl<T, Func> FitnessFunction<T> for Func
where
    Func: Fn(&T) -> Result<f64, EvaluationError>,
{
    fn evaluate(&self, candidate: &T) -> Result<f64, EvaluationError> {
        self(candidate)
    }
}
