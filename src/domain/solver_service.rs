// Domain service interface for solving blend models
// Defines the contract that any solver implementation must follow (Dependency Inversion Principle)

use super::models::{BlendModel, SolveResult};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Absolute tolerance for integrality and trivial row checks
pub const TOLERANCE: f64 = 1e-6;

/// Domain service interface for MILP solvers
///
/// Implementations take a built model and return the raw solution without
/// interpreting it. Infeasible and unbounded outcomes are `Ok` results; only
/// a malformed model or a failing backend is an error.
pub trait SolverService: Send + Sync {
    /// Solve a blend model
    fn solve(&self, model: &BlendModel) -> Result<SolveResult>;

    /// Validate a model without solving it
    fn validate(&self, model: &BlendModel) -> Result<()> {
        let mut errors = Vec::new();

        for (name, bounds) in &model.constraints {
            if !bounds.is_finite() {
                errors.push(format!("Constraint '{}' has a non-finite bound", name));
            }
        }

        for (var, column) in &model.variables {
            for (term, coeff) in column {
                if !coeff.is_finite() {
                    errors.push(format!(
                        "Variable '{}' has a non-finite coefficient under '{}'",
                        var, term
                    ));
                }
            }
        }

        for var in &model.integers {
            if !model.variables.contains_key(var) {
                errors.push(format!("Integer variable '{}' is not declared", var));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

/// Rows without any non-zero term that zero cannot satisfy
///
/// Backends receive no such rows; a model containing one is infeasible
/// before any solve.
pub fn violated_empty_row(model: &BlendModel) -> Option<&str> {
    model
        .rows()
        .into_iter()
        .find(|row| row.terms.is_empty() && !row.bounds.admits(0.0, TOLERANCE))
        .map(|row| row.name)
}

/// Snap integer variables that sit within tolerance of an integer
///
/// Returns whether every integer variable ended up integral.
pub fn snap_integers(model: &BlendModel, values: &mut std::collections::BTreeMap<String, f64>) -> bool {
    let mut integral = true;
    for var in &model.integers {
        if let Some(value) = values.get_mut(var) {
            let rounded = value.round();
            if (*value - rounded).abs() <= TOLERANCE {
                *value = rounded;
            } else {
                integral = false;
            }
        }
    }
    integral
}
