//! Expression tree genomes
//!
//! This module provides the `TreeNode` / `ExpressionTree` types and the stock node set.

pub mod primitives;
pub mod tree;

pub mod prelude {
    pub use super::primitives::*;
    pub use super::tree::*;
}
