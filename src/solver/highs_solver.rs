// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates blend models to the HiGHS row API

use std::collections::BTreeMap;

use highs::{HighsModelStatus, RowProblem, Sense};

use crate::domain::{
    models::{BlendModel, SolveResult},
    solver_service::{snap_integers, violated_empty_row, Result, SolverError, SolverService},
    value_objects::OptimizationType,
};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &BlendModel) -> Result<SolveResult> {
        // Validate first
        self.validate(model)?;

        if let Some(row) = violated_empty_row(model) {
            tracing::debug!(row, "empty row cannot be satisfied, skipping HiGHS");
            return Ok(SolveResult::infeasible());
        }

        tracing::debug!(
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            integers = model.integers.len(),
            "solving with HiGHS"
        );

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();
        let objective: BTreeMap<&str, f64> = model.objective_terms().collect();
        let mut columns = BTreeMap::new();
        let mut names = Vec::new();

        for name in model.variables.keys() {
            let obj_coeff = objective.get(name.as_str()).copied().unwrap_or(0.0);
            let col = if model.is_integer(name) {
                pb.add_integer_column(obj_coeff, 0.0..f64::INFINITY)
            } else {
                pb.add_column(obj_coeff, 0.0..f64::INFINITY)
            };
            columns.insert(name.as_str(), col);
            names.push(name.as_str());
        }

        // Add constraints
        for row in model.rows() {
            if row.terms.is_empty() {
                continue;
            }
            let terms: Vec<_> = row
                .terms
                .iter()
                .map(|&(name, coeff)| (columns[name], coeff))
                .collect();

            let lower = max_of(row.bounds.min, row.bounds.equal);
            let upper = min_of(row.bounds.max, row.bounds.equal);
            match (lower, upper) {
                (Some(lo), Some(hi)) => {
                    pb.add_row(lo..=hi, &terms);
                }
                (Some(lo), None) => {
                    pb.add_row(lo.., &terms);
                }
                (None, Some(hi)) => {
                    pb.add_row(..=hi, &terms);
                }
                (None, None) => {}
            }
        }

        let sense = match model.objective.direction {
            OptimizationType::Maximize => Sense::Maximise,
        };

        let solved = pb.optimise(sense).solve();

        // Process result
        match solved.status() {
            HighsModelStatus::Optimal => {
                let solution = solved.get_solution();
                let mut values: BTreeMap<String, f64> = names
                    .iter()
                    .zip(solution.columns())
                    .map(|(name, value)| (name.to_string(), *value))
                    .collect();
                let is_integral = snap_integers(model, &mut values);
                let result = model.objective_value(&values);

                Ok(SolveResult::optimal(result, values, is_integral))
            }
            status => non_optimal_outcome(status),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Outcome for every status other than `Optimal`
///
/// Each grain column is capped by its capacity row, so a blend model is never
/// unbounded; presolve reports `UnboundedOrInfeasible` for infeasible MIPs.
fn non_optimal_outcome(status: HighsModelStatus) -> Result<SolveResult> {
    match status {
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            Ok(SolveResult::infeasible())
        }
        HighsModelStatus::Unbounded => Ok(SolveResult::unbounded()),
        status => Err(SolverError::ExecutionFailed(format!(
            "HiGHS solver returned status: {:?}",
            status
        ))),
    }
}

fn max_of(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

fn min_of(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_model, Grain, ObjectiveVariant};

    #[test]
    fn unbounded_or_infeasible_is_infeasible() {
        let result = non_optimal_outcome(HighsModelStatus::UnboundedOrInfeasible).unwrap();
        assert!(!result.feasible);
        assert!(result.bounded);
        assert!(result.values.is_empty());
    }

    #[test]
    fn over_demand_is_infeasible() {
        let grains = vec![Grain::new(1u64, 100.0), Grain::new(2u64, 50.0)];
        let model = build_model(ObjectiveVariant::Slack, &grains, &[], 151.0);

        let result = HighsSolver::new().solve(&model).unwrap();
        assert!(!result.feasible);
    }
}
