//! # evo-core
//!
//! Expression-tree evaluation and fitness-based selection for evolutionary computation.
//!
//! Two independent pieces make up the crate. Expression trees score candidate
//! programs against a parameter vector, and selection strategies draw the next
//! breeding pool from a scored population. They only meet in the caller's
//! generational loop.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evo_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! // (> x0 x1)
//! let tree = ExpressionTree::new(TreeNode::is_greater(
//!     TreeNode::parameter(0),
//!     TreeNode::parameter(1),
//! ))?;
//! assert_eq!(tree.evaluate(&[2.0, 1.0])?, 1.0);
//!
//! let population = Population::evaluate(candidates, &fitness)?;
//! let pool = population.select(&TournamentSelection::new(0.7)?, 100, &mut rng)?;
//! ```

pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
