//! Expression trees for genetic programming
//!
//! This module provides the tree representation evaluated against a parameter
//! vector. Node kinds are supplied through the [`Terminal`] and [`Function`]
//! traits, so new primitives are added without touching the tree code.
//!
//! Evaluation, validation, dropping and the size/depth queries all walk the
//! tree with an explicit work stack. A pathologically unbalanced tree therefore
//! cannot overflow the call stack on those paths.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::mem;

use crate::error::{EvaluationError, GenomeError};
use crate::genome::primitives::{Operator, Primitive};

/// Default maximum depth of an [`ExpressionTree`]
pub const DEFAULT_MAX_DEPTH: usize = 17;

/// Trait for terminal nodes in GP trees
pub trait Terminal:
    Clone + Send + Sync + PartialEq + fmt::Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Evaluate this terminal with the given program parameters
    fn evaluate(&self, parameters: &[f64]) -> Result<f64, EvaluationError>;

    /// The parameter slot read by this terminal, if any
    fn parameter_index(&self) -> Option<usize> {
        None
    }

    /// Convert to string representation
    fn symbol(&self) -> String;
}

/// Trait for function nodes in GP trees
pub trait Function:
    Clone + Send + Sync + PartialEq + fmt::Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Get the arity (number of arguments) of this function
    fn arity(&self) -> usize;

    /// Apply this function to the evaluated children
    ///
    /// `args` always has exactly `self.arity()` elements.
    fn apply(&self, args: &[f64]) -> f64;

    /// Convert to string representation
    fn symbol(&self) -> String;
}

/// A node in a GP tree
///
/// Function nodes own their children outright; a subtree belongs to exactly
/// one parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum TreeNode<T: Terminal = Primitive, F: Function = Operator> {
    /// Terminal node (leaf)
    Terminal(T),
    /// Function node (internal)
    Function(F, Vec<TreeNode<T, F>>),
}

/// Pending work while walking a tree bottom-up
enum Step<'a, T: Terminal, F: Function> {
    Visit(&'a TreeNode<T, F>),
    Apply(&'a F, usize),
}

impl<T: Terminal, F: Function> TreeNode<T, F> {
    /// Create a new terminal node
    pub fn terminal(value: T) -> Self {
        Self::Terminal(value)
    }

    /// Create a new function node, checking the child count against the arity
    pub fn function(func: F, children: Vec<Self>) -> Result<Self, GenomeError> {
        if children.len() != func.arity() {
            return Err(GenomeError::ArityMismatch {
                symbol: func.symbol(),
                expected: func.arity(),
                actual: children.len(),
            });
        }
        Ok(Self::Function(func, children))
    }

    /// Check if this is a terminal node
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Check if this is a function node
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_, _))
    }

    /// Number of children this node owns
    pub fn arity(&self) -> usize {
        match self {
            Self::Terminal(_) => 0,
            Self::Function(_, children) => children.len(),
        }
    }

    /// Child nodes in order (empty for terminals)
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Terminal(_) => &[],
            Self::Function(_, children) => children,
        }
    }

    /// Preorder iterator over every node of this subtree
    pub fn nodes(&self) -> Nodes<'_, T, F> {
        Nodes { stack: vec![self] }
    }

    /// Get the depth of this subtree (a lone terminal has depth 1)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children().iter().map(|c| (c, depth + 1)));
        }
        max_depth
    }

    /// Get the number of nodes in this subtree
    pub fn size(&self) -> usize {
        self.nodes().count()
    }

    /// Minimum parameter-vector length needed to evaluate this subtree
    pub fn required_parameters(&self) -> usize {
        self.nodes()
            .filter_map(|node| match node {
                Self::Terminal(t) => t.parameter_index(),
                Self::Function(_, _) => None,
            })
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Get a subtree at the given path of child indices
    pub fn get_subtree(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, &idx| node.children().get(idx))
    }

    /// Evaluate this subtree against the given parameters
    ///
    /// Children are evaluated left to right and combined by their parent's
    /// function. The node is never mutated, so the same tree may be evaluated
    /// repeatedly or from several threads at once.
    pub fn evaluate(&self, parameters: &[f64]) -> Result<f64, EvaluationError> {
        let mut work = vec![Step::Visit(self)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(Self::Terminal(t)) => values.push(t.evaluate(parameters)?),
                Step::Visit(Self::Function(f, children)) => {
                    if children.len() != f.arity() {
                        return Err(EvaluationError::ArityMismatch {
                            symbol: f.symbol(),
                            expected: f.arity(),
                            actual: children.len(),
                        });
                    }
                    work.push(Step::Apply(f, children.len()));
                    // Reversed so the first child is evaluated first
                    work.extend(children.iter().rev().map(Step::Visit));
                }
                Step::Apply(f, arity) => {
                    let start = values.len() - arity;
                    let result = f.apply(&values[start..]);
                    values.truncate(start);
                    values.push(result);
                }
            }
        }

        Ok(values
            .pop()
            .expect("evaluation always leaves the root value on the stack"))
    }

    /// Check arity of every function node and the overall depth
    fn validate(&self, max_depth: usize) -> Result<(), GenomeError> {
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(GenomeError::DepthExceeded {
                    depth: self.depth(),
                    max_depth,
                });
            }
            if let Self::Function(f, children) = node {
                if children.len() != f.arity() {
                    return Err(GenomeError::ArityMismatch {
                        symbol: f.symbol(),
                        expected: f.arity(),
                        actual: children.len(),
                    });
                }
                stack.extend(children.iter().map(|c| (c, depth + 1)));
            }
        }
        Ok(())
    }
}

impl<T: Terminal, F: Function> Drop for TreeNode<T, F> {
    // Flatten the subtree onto the heap so dropping never recurses per level
    fn drop(&mut self) {
        if let Self::Function(_, children) = self {
            let mut pending = mem::take(children);
            while let Some(mut node) = pending.pop() {
                if let Self::Function(_, grandchildren) = &mut node {
                    pending.append(grandchildren);
                }
            }
        }
    }
}

impl<T: Terminal, F: Function> fmt::Display for TreeNode<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(t) => write!(f, "{}", t.symbol()),
            Self::Function(func, children) => {
                write!(f, "({}", func.symbol())?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Preorder iterator returned by [`TreeNode::nodes`]
pub struct Nodes<'a, T: Terminal, F: Function> {
    stack: Vec<&'a TreeNode<T, F>>,
}

impl<'a, T: Terminal, F: Function> Iterator for Nodes<'a, T, F> {
    type Item = &'a TreeNode<T, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// A validated, immutable expression tree
///
/// Construction checks that every function node has exactly as many children
/// as its arity and that the tree is no deeper than `max_depth`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct ExpressionTree<T: Terminal = Primitive, F: Function = Operator> {
    root: TreeNode<T, F>,
    max_depth: usize,
}

/// Wire form of an [`ExpressionTree`], validated on the way in
#[derive(Deserialize)]
#[serde(bound = "")]
struct UncheckedTree<T: Terminal, F: Function> {
    root: TreeNode<T, F>,
    max_depth: usize,
}

impl<'de, T: Terminal, F: Function> Deserialize<'de> for ExpressionTree<T, F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = UncheckedTree::deserialize(deserializer)?;
        Self::with_max_depth(raw.root, raw.max_depth).map_err(de::Error::custom)
    }
}

impl<T: Terminal, F: Function> ExpressionTree<T, F> {
    /// Create a new tree limited to [`DEFAULT_MAX_DEPTH`]
    pub fn new(root: TreeNode<T, F>) -> Result<Self, GenomeError> {
        Self::with_max_depth(root, DEFAULT_MAX_DEPTH)
    }

    /// Create a new tree with an explicit depth limit
    pub fn with_max_depth(root: TreeNode<T, F>, max_depth: usize) -> Result<Self, GenomeError> {
        root.validate(max_depth)?;
        Ok(Self { root, max_depth })
    }

    /// Root node of the tree
    pub fn root(&self) -> &TreeNode<T, F> {
        &self.root
    }

    /// Maximum allowed depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Get the depth of the tree
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Get the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Minimum parameter-vector length needed to evaluate the tree
    pub fn required_parameters(&self) -> usize {
        self.root.required_parameters()
    }

    /// Evaluate the tree with the given parameters
    ///
    /// Extra parameters are ignored. Too few fail with
    /// [`EvaluationError::ParameterOutOfRange`] at the first terminal that
    /// reads past the end.
    pub fn evaluate(&self, parameters: &[f64]) -> Result<f64, EvaluationError> {
        self.root.evaluate(parameters)
    }

    /// Convert tree to S-expression string
    pub fn to_sexpr(&self) -> String {
        self.root.to_string()
    }

    /// Take the root node out of the tree
    pub fn into_root(self) -> TreeNode<T, F> {
        self.root
    }
}

impl<T: Terminal, F: Function> fmt::Display for ExpressionTree<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> TreeNode {
        TreeNode::terminal(Primitive::Constant(value))
    }

    fn parameter(index: usize) -> TreeNode {
        TreeNode::terminal(Primitive::Parameter(index))
    }

    fn binary(op: Operator, left: TreeNode, right: TreeNode) -> TreeNode {
        TreeNode::function(op, vec![left, right]).unwrap()
    }

    #[test]
    fn test_tree_node_terminal() {
        let node = parameter(0);
        assert!(node.is_terminal());
        assert!(!node.is_function());
        assert_eq!(node.depth(), 1);
        assert_eq!(node.size(), 1);
        assert_eq!(node.arity(), 0);
    }

    #[test]
    fn test_tree_node_function() {
        let node = binary(Operator::Add, parameter(0), constant(1.0));

        assert!(!node.is_terminal());
        assert!(node.is_function());
        assert_eq!(node.depth(), 2);
        assert_eq!(node.size(), 3);
        assert_eq!(node.arity(), 2);
    }

    #[test]
    fn test_function_rejects_wrong_child_count() {
        let result = TreeNode::function(Operator::IsGreater, vec![constant(1.0)]);
        assert_eq!(
            result,
            Err(GenomeError::ArityMismatch {
                symbol: ">".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_nodes_preorder() {
        // (+ x0 (* 1.0 x1))
        let mul = binary(Operator::Mul, constant(1.0), parameter(1));
        let add = binary(Operator::Add, parameter(0), mul);

        let symbols: Vec<String> = add
            .nodes()
            .map(|n| match n {
                TreeNode::Terminal(t) => t.symbol(),
                TreeNode::Function(f, _) => f.symbol(),
            })
            .collect();
        assert_eq!(symbols, vec!["+", "x0", "*", "1.0000", "x1"]);
    }

    #[test]
    fn test_tree_node_get_subtree() {
        let x0 = parameter(0);
        let add = binary(Operator::Add, x0.clone(), constant(1.0));

        assert_eq!(add.get_subtree(&[]), Some(&add));
        assert_eq!(add.get_subtree(&[0]), Some(&x0));
        assert!(add.get_subtree(&[2]).is_none());
        assert!(add.get_subtree(&[0, 0]).is_none());
    }

    #[test]
    fn test_required_parameters() {
        let tree = binary(Operator::Add, parameter(3), parameter(1));
        assert_eq!(tree.required_parameters(), 4);
        assert_eq!(constant(2.0).required_parameters(), 0);
    }

    #[test]
    fn test_expression_tree_evaluate() {
        // (* (+ x0 1) x1) = (x0 + 1) * x1
        let add = binary(Operator::Add, parameter(0), constant(1.0));
        let mul = binary(Operator::Mul, add, parameter(1));
        let tree = ExpressionTree::new(mul).unwrap();

        assert_eq!(tree.evaluate(&[2.0, 3.0]), Ok(9.0));
    }

    #[test]
    fn test_evaluate_evaluates_children_in_order() {
        // (- x0 x1) must not swap operands
        let sub = binary(Operator::Sub, parameter(0), parameter(1));
        assert_eq!(sub.evaluate(&[10.0, 4.0]), Ok(6.0));
    }

    #[test]
    fn test_extra_parameters_ignored() {
        let tree = ExpressionTree::new(parameter(0)).unwrap();
        assert_eq!(tree.evaluate(&[5.0, 6.0, 7.0]), Ok(5.0));
    }

    #[test]
    fn test_missing_parameter_fails() {
        let tree = ExpressionTree::new(binary(Operator::Add, parameter(0), parameter(2))).unwrap();
        assert_eq!(
            tree.evaluate(&[1.0, 2.0]),
            Err(EvaluationError::ParameterOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_raw_node_arity_checked_at_evaluation() {
        let bad: TreeNode = TreeNode::Function(Operator::Add, vec![constant(1.0)]);
        assert!(matches!(
            bad.evaluate(&[]),
            Err(EvaluationError::ArityMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_expression_tree_rejects_bad_arity() {
        let bad: TreeNode = TreeNode::Function(Operator::Neg, vec![constant(1.0), constant(2.0)]);
        assert!(matches!(
            ExpressionTree::new(bad),
            Err(GenomeError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_expression_tree_depth_limit() {
        let mut node = parameter(0);
        for _ in 0..4 {
            node = TreeNode::function(Operator::Neg, vec![node]).unwrap();
        }
        assert_eq!(node.depth(), 5);

        assert!(ExpressionTree::with_max_depth(node.clone(), 5).is_ok());
        assert_eq!(
            ExpressionTree::with_max_depth(node, 4),
            Err(GenomeError::DepthExceeded {
                depth: 5,
                max_depth: 4,
            })
        );
    }

    #[test]
    fn test_deep_tree_evaluates_without_recursion() {
        let mut node = constant(1.0);
        for _ in 0..100_000 {
            node = TreeNode::function(Operator::Neg, vec![node]).unwrap();
        }

        assert_eq!(node.depth(), 100_001);
        assert_eq!(node.evaluate(&[]), Ok(1.0));
    }

    #[test]
    fn test_deep_tree_rejected_at_construction() {
        let mut node = constant(1.0);
        for _ in 0..100_000 {
            node = TreeNode::function(Operator::Neg, vec![node]).unwrap();
        }

        assert_eq!(
            ExpressionTree::new(node),
            Err(GenomeError::DepthExceeded {
                depth: 100_001,
                max_depth: DEFAULT_MAX_DEPTH,
            })
        );
    }

    #[test]
    fn test_deep_subtree_lookup() {
        let mut node = parameter(0);
        for _ in 0..100_000 {
            node = TreeNode::function(Operator::Abs, vec![node]).unwrap();
        }
        let subtree = node.get_subtree(&[0; 50_000]).map(|n| n.depth());
        assert_eq!(subtree, Some(50_001));
        drop(node);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let gt = binary(Operator::IsGreater, parameter(0), parameter(1));
        let tree = ExpressionTree::new(binary(Operator::Div, gt, parameter(2))).unwrap();

        let params = [0.3, 0.1, 7.0];
        let first = tree.evaluate(&params).unwrap();
        let second = tree.evaluate(&params).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_concurrent_evaluation() {
        let tree = ExpressionTree::new(binary(Operator::Mul, parameter(0), parameter(0))).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let tree = &tree;
                    s.spawn(move || tree.evaluate(&[i as f64]).unwrap())
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap(), (i * i) as f64);
            }
        });
    }

    #[test]
    fn test_expression_tree_display() {
        let gt = binary(Operator::IsGreater, parameter(0), constant(1.0));
        let tree = ExpressionTree::new(gt).unwrap();

        assert_eq!(tree.to_sexpr(), "(> x0 1.0000)");
        assert_eq!(format!("{}", tree), tree.to_sexpr());
    }

    #[test]
    fn test_expression_tree_serde_validates() {
        let tree = ExpressionTree::new(binary(Operator::Add, parameter(0), constant(2.5))).unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: ExpressionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);

        let too_shallow = json.replace("\"max_depth\":17", "\"max_depth\":1");
        assert!(serde_json::from_str::<ExpressionTree>(&too_shallow).is_err());
    }
}
