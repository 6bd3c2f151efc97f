//! Fitness evaluation
//!
//! This module provides the fitness abstraction used to score candidates.

pub mod traits;

pub mod prelude {
    pub use super::traits::*;
}
