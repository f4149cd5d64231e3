// microlp Solver Adapter
// Pure Rust MILP backend (branch and bound over integer variables)

use std::collections::BTreeMap;

use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

use crate::domain::{
    models::{BlendModel, SolveResult},
    solver_service::{snap_integers, violated_empty_row, Result, SolverError, SolverService},
    value_objects::OptimizationType,
};

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, model: &BlendModel) -> Result<SolveResult> {
        self.validate(model)?;

        if let Some(row) = violated_empty_row(model) {
            tracing::debug!(row, "empty row cannot be satisfied, skipping microlp");
            return Ok(SolveResult::infeasible());
        }

        tracing::debug!(
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            integers = model.integers.len(),
            "solving with microlp"
        );

        let mut problem = Problem::new(match model.objective.direction {
            OptimizationType::Maximize => OptimizationDirection::Maximize,
        });

        let objective: BTreeMap<&str, f64> = model.objective_terms().collect();
        let mut columns = BTreeMap::new();
        for name in model.variables.keys() {
            let coeff = objective.get(name.as_str()).copied().unwrap_or(0.0);
            // Column limits mirror the capacity rows; branch and bound needs them tight
            let var = if model.is_integer(name) {
                problem.add_integer_var(coeff, (0, integer_limit(model, name)?))
            } else {
                let upper = model.capacity(name).unwrap_or(f64::INFINITY);
                problem.add_var(coeff, (0.0, upper))
            };
            columns.insert(name.as_str(), var);
        }

        for row in model.rows() {
            if row.terms.is_empty() {
                continue;
            }
            let sides = [
                (row.bounds.equal, ComparisonOp::Eq),
                (row.bounds.min, ComparisonOp::Ge),
                (row.bounds.max, ComparisonOp::Le),
            ];
            for (rhs, op) in sides {
                if let Some(rhs) = rhs {
                    let mut expr = LinearExpr::empty();
                    for &(name, coeff) in &row.terms {
                        expr.add(columns[name], coeff);
                    }
                    problem.add_constraint(expr, op, rhs);
                }
            }
        }

        match problem.solve() {
            Ok(solution) => {
                let mut values: BTreeMap<String, f64> = columns
                    .iter()
                    .map(|(name, &var)| (name.to_string(), solution[var]))
                    .collect();
                let is_integral = snap_integers(model, &mut values);
                let result = model.objective_value(&values);

                Ok(SolveResult::optimal(result, values, is_integral))
            }
            Err(microlp::Error::Infeasible) => Ok(SolveResult::infeasible()),
            Err(microlp::Error::Unbounded) => Ok(SolveResult::unbounded()),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Integer column limit for a variable, bounded by what microlp can represent
fn integer_limit(model: &BlendModel, name: &str) -> Result<i32> {
    let Some(capacity) = model.capacity(name) else {
        return Ok(i32::MAX);
    };
    let limit = capacity.floor();
    if limit > i32::MAX as f64 {
        return Err(SolverError::InvalidProblem(format!(
            "capacity {} of '{}' exceeds the microlp integer limit {}",
            capacity,
            name,
            i32::MAX
        )));
    }
    Ok(limit.max(0.0) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_model, extract_bounds, BlendSpecification, Grain, ObjectiveVariant};

    #[test]
    fn integer_columns_take_the_grain_capacity() {
        let grains = vec![Grain::new(1u64, 40.5), Grain::new(2u64, 0.0)];
        let model = build_model(ObjectiveVariant::Slack, &grains, &[], 30.0);

        assert_eq!(integer_limit(&model, "grain_1").unwrap(), 40);
        assert_eq!(integer_limit(&model, "grain_2").unwrap(), 0);
    }

    #[test]
    fn capacity_beyond_i32_is_rejected() {
        let grains = vec![Grain::new(1u64, 3e9), Grain::new(2u64, 1e9)];
        let spec = BlendSpecification::new().with_bound("min_protein", 0.1);
        let model = build_model(
            ObjectiveVariant::Slack,
            &grains,
            &extract_bounds(&spec, 3.5e9),
            3.5e9,
        );

        let err = MicroLpSolver::new().solve(&model).unwrap_err();
        assert!(matches!(err, SolverError::InvalidProblem(msg) if msg.contains("grain_1")));
    }
}
