//! LP/MILP solving.
//!
//! The planner describes each candidate diet as a solver-agnostic
//! [`DietProgram`]; a [`MilpSolver`] implementation turns it into servings.

mod microlp;

use std::time::Duration;

use thiserror::Error;

pub use microlp::MicroLpSolver;

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Continuous,
    Integer,
    Binary,
}

/// A decision variable with box bounds. `upper` may be infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub kind: VariableKind,
}

impl VariableSpec {
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            kind: VariableKind::Continuous,
        }
    }

    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            kind: VariableKind::Integer,
            ..Self::continuous(name, lower, upper)
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            kind: VariableKind::Binary,
            ..Self::continuous(name, 0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

/// Sparse linear constraint: `Σ coef·x[idx] (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn leq(name: impl Into<String>, terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    pub fn geq(name: impl Into<String>, terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    pub fn eq(name: impl Into<String>, terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    /// Evaluate the left-hand side at `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(i, c)| c * values.get(i).copied().unwrap_or(0.0))
            .sum()
    }
}

/// A minimisation program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietProgram {
    pub variables: Vec<VariableSpec>,
    /// Dense objective coefficients, parallel to `variables`.
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl DietProgram {
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

/// Optimal variable values and objective.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSolution {
    pub values: Vec<f64>,
    pub objective: f64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolverError {
    #[error("program is infeasible")]
    Infeasible,

    #[error("program is unbounded")]
    Unbounded,

    #[error("solve timed out after {0:?}")]
    Timeout(Duration),

    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// External LP/MILP capability.
///
/// Implementations must be thread-safe; the optimiser may solve several
/// programs concurrently.
pub trait MilpSolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Solve to optimality, or explain why not.
    fn solve(&self, program: &DietProgram) -> Result<ProgramSolution, SolverError>;
}
