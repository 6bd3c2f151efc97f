//! Stock terminals and functions for expression trees

use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, GenomeError};
use crate::genome::tree::{Function, Terminal, TreeNode};

/// Standard terminals: constants and references to program parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Constant value
    Constant(f64),
    /// The parameter at the given index
    Parameter(usize),
}

impl Terminal for Primitive {
    fn evaluate(&self, parameters: &[f64]) -> Result<f64, EvaluationError> {
        match *self {
            Self::Constant(c) => Ok(c),
            Self::Parameter(index) => {
                parameters
                    .get(index)
                    .copied()
                    .ok_or(EvaluationError::ParameterOutOfRange {
                        index,
                        len: parameters.len(),
                    })
            }
        }
    }

    fn parameter_index(&self) -> Option<usize> {
        match *self {
            Self::Parameter(index) => Some(index),
            Self::Constant(_) => None,
        }
    }

    fn symbol(&self) -> String {
        match self {
            Self::Constant(c) => format!("{:.4}", c),
            Self::Parameter(i) => format!("x{}", i),
        }
    }
}

/// Standard functions for symbolic regression and simple programs
///
/// Comparisons encode booleans as `1.0` / `0.0` and follow IEEE ordering,
/// so any comparison involving NaN is false.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Protected division (returns 1.0 for division by zero)
    Div,
    /// Power (protected)
    Pow,
    /// Negation
    Neg,
    /// Absolute value
    Abs,
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Exponential
    Exp,
    /// Natural logarithm (protected)
    Log,
    /// Square root (protected)
    Sqrt,
    /// `1.0` if the first argument is strictly greater than the second, else `0.0`
    IsGreater,
    /// Second argument if the first is positive, otherwise the third
    IfThenElse,
}

impl Operator {
    /// Every operator, in declaration order
    pub const ALL: [Operator; 14] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Pow,
        Self::Neg,
        Self::Abs,
        Self::Sin,
        Self::Cos,
        Self::Exp,
        Self::Log,
        Self::Sqrt,
        Self::IsGreater,
        Self::IfThenElse,
    ];
}

impl Function for Operator {
    fn arity(&self) -> usize {
        match self {
            Self::Neg | Self::Abs | Self::Sin | Self::Cos | Self::Exp | Self::Log | Self::Sqrt => 1,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow | Self::IsGreater => 2,
            Self::IfThenElse => 3,
        }
    }

    fn apply(&self, args: &[f64]) -> f64 {
        match self {
            Self::Add => args[0] + args[1],
            Self::Sub => args[0] - args[1],
            Self::Mul => args[0] * args[1],
            Self::Div => {
                if args[1].abs() < 1e-10 {
                    1.0
                } else {
                    args[0] / args[1]
                }
            }
            Self::Pow => {
                let (base, exp) = (args[0], args[1]);
                if base.abs() < 1e-10 && exp < 0.0 {
                    0.0
                } else {
                    base.powf(exp).clamp(-1e10, 1e10)
                }
            }
            Self::Neg => -args[0],
            Self::Abs => args[0].abs(),
            Self::Sin => args[0].sin(),
            Self::Cos => args[0].cos(),
            Self::Exp => {
                if args[0] > 700.0 {
                    f64::MAX
                } else {
                    args[0].exp()
                }
            }
            Self::Log => {
                if args[0] <= 0.0 {
                    0.0
                } else {
                    args[0].ln()
                }
            }
            Self::Sqrt => args[0].abs().sqrt(),
            Self::IsGreater => {
                if args[0] > args[1] {
                    1.0
                } else {
                    0.0
                }
            }
            Self::IfThenElse => {
                if args[0] > 0.0 {
                    args[1]
                } else {
                    args[2]
                }
            }
        }
    }

    fn symbol(&self) -> String {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "pow",
            Self::Neg => "neg",
            Self::Abs => "abs",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::IsGreater => ">",
            Self::IfThenElse => "if",
        }
        .to_string()
    }
}

/// Convenience constructors for trees built from the stock primitives
impl TreeNode<Primitive, Operator> {
    /// A constant leaf
    pub fn constant(value: f64) -> Self {
        Self::Terminal(Primitive::Constant(value))
    }

    /// A leaf reading the parameter at `index`
    pub fn parameter(index: usize) -> Self {
        Self::Terminal(Primitive::Parameter(index))
    }

    /// A one-argument node
    pub fn unary(op: Operator, child: Self) -> Result<Self, GenomeError> {
        Self::function(op, vec![child])
    }

    /// A two-argument node
    pub fn binary(op: Operator, left: Self, right: Self) -> Result<Self, GenomeError> {
        Self::function(op, vec![left, right])
    }

    /// `1.0` if `left` evaluates strictly greater than `right`, else `0.0`
    pub fn is_greater(left: Self, right: Self) -> Self {
        Self::Function(Operator::IsGreater, vec![left, right])
    }

    /// `then` if `condition` evaluates positive, otherwise `otherwise`
    pub fn if_then_else(condition: Self, then: Self, otherwise: Self) -> Self {
        Self::Function(Operator::IfThenElse, vec![condition, then, otherwise])
    }
}
