//! Error types for evo-core
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for expression tree construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// A function node was given the wrong number of children
    #[error("Arity mismatch for '{symbol}': expected {expected} children, got {actual}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    /// The tree is deeper than the configured limit
    #[error("Tree depth {depth} exceeds maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Error type raised while evaluating trees, scoring candidates or selecting
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// A parameter terminal referenced a slot past the end of the parameter vector
    #[error("Parameter index {index} out of range for {len} parameters")]
    ParameterOutOfRange { index: usize, len: usize },

    /// A function node was evaluated with the wrong number of children
    #[error("Arity mismatch for '{symbol}': expected {expected} children, got {actual}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    /// Selection was attempted on an empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Selection size must be at least one
    #[error("Invalid selection size: {0}")]
    InvalidSelectionSize(usize),

    /// The fitness function reported a failure
    #[error("Fitness evaluation failed: {0}")]
    Fitness(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
