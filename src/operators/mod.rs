//! Genetic operators
//!
//! This module provides the selection strategy abstraction and tournament selection.

pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::selection::*;
    pub use super::traits::*;
}
