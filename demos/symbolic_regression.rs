//! Symbolic Regression Example
//!
//! Scores a handful of candidate expressions against samples of
//! f(x) = x^2 + x + 1 and draws a breeding pool with tournament selection.
//!
//! Run with `RUST_LOG=debug` to see the library's own log output.

use evo_core::prelude::*;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn target_function(x: f64) -> f64 {
    x * x + x + 1.0
}

fn candidates() -> Result<Vec<ExpressionTree>, GenomeError> {
    let x = || TreeNode::parameter(0);
    let one = || TreeNode::constant(1.0);

    let roots = vec![
        // x
        x(),
        // x * x
        TreeNode::binary(Operator::Mul, x(), x())?,
        // x * x + x
        TreeNode::binary(Operator::Add, TreeNode::binary(Operator::Mul, x(), x())?, x())?,
        // x * x + x + 1 (exact)
        TreeNode::binary(
            Operator::Add,
            TreeNode::binary(Operator::Add, TreeNode::binary(Operator::Mul, x(), x())?, x())?,
            one(),
        )?,
        // if x > 0 then x * x else 1
        TreeNode::if_then_else(
            TreeNode::is_greater(x(), TreeNode::constant(0.0)),
            TreeNode::binary(Operator::Mul, x(), x())?,
            one(),
        ),
    ];

    roots.into_iter().map(ExpressionTree::new).collect()
}

fn main() -> EvoResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(42);

    let samples: Vec<(f64, f64)> = (-10..=10)
        .map(|i| {
            let x = i as f64 * 0.5;
            (x, target_function(x))
        })
        .collect();

    // Negated mean squared error, so that higher is better
    let fitness = |tree: &ExpressionTree| -> Result<f64, EvaluationError> {
        let mut error = 0.0;
        for &(x, y) in &samples {
            error += (tree.evaluate(&[x])? - y).powi(2);
        }
        Ok(-error / samples.len() as f64)
    };

    let population = Population::evaluate(candidates()?, &fitness)?;
    for candidate in &population {
        info!("{:>10.4}  {}", candidate.fitness(), candidate.candidate());
    }
    info!("Best: {}", population.best().candidate());

    let selection = TournamentSelection::new(0.8)?;
    let pool = population.select(&selection, 20, &mut rng)?;

    info!("Breeding pool ({} candidates):", pool.len());
    for tree in &pool {
        info!("  {}", tree);
    }

    Ok(())
}
