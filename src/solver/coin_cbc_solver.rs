// COIN-OR CBC Solver Adapter
// Implements the SolverService interface for CBC, driven through good_lp

use std::collections::BTreeMap;

use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};

use crate::domain::{
    models::{BlendModel, ModelRow, SolveResult},
    solver_service::{snap_integers, violated_empty_row, Result, SolverError, SolverService},
    value_objects::OptimizationType,
};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &BlendModel) -> Result<SolveResult> {
        // Validate first
        self.validate(model)?;

        if let Some(row) = violated_empty_row(model) {
            tracing::debug!(row, "empty row cannot be satisfied, skipping CBC");
            return Ok(SolveResult::infeasible());
        }

        tracing::debug!(
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            integers = model.integers.len(),
            "solving with COIN-OR CBC"
        );

        // Build variables using good_lp
        let mut vars = variables!();
        let mut columns: BTreeMap<&str, GoodLpVariable> = BTreeMap::new();
        for name in model.variables.keys() {
            let def = if model.is_integer(name) {
                variable().integer().min(0.0)
            } else {
                variable().min(0.0)
            };
            columns.insert(name.as_str(), vars.add(def));
        }

        // Build objective expression
        let mut objective: Expression = 0.into();
        for (name, coeff) in model.objective_terms() {
            objective += coeff * columns[name];
        }

        let unsolved = match model.objective.direction {
            OptimizationType::Maximize => vars.maximise(objective),
        };
        let mut lp_model = unsolved.using(coin_cbc::coin_cbc);

        // Build constraints
        for row in model.rows() {
            if row.terms.is_empty() {
                continue;
            }
            lp_model = add_row(lp_model, &row, &columns);
        }

        match lp_model.solve() {
            Ok(sol) => {
                let mut values: BTreeMap<String, f64> = columns
                    .iter()
                    .map(|(name, &var)| (name.to_string(), sol.value(var)))
                    .collect();
                let is_integral = snap_integers(model, &mut values);
                let result = model.objective_value(&values);

                Ok(SolveResult::optimal(result, values, is_integral))
            }
            Err(ResolutionError::Infeasible) => Ok(SolveResult::infeasible()),
            Err(ResolutionError::Unbounded) => Ok(SolveResult::unbounded()),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

fn add_row<M: SolverModel>(
    mut lp_model: M,
    row: &ModelRow<'_>,
    columns: &BTreeMap<&str, GoodLpVariable>,
) -> M {
    let mut lhs: Expression = 0.into();
    for &(name, coeff) in &row.terms {
        lhs += coeff * columns[name];
    }

    if let Some(equal) = row.bounds.equal {
        lp_model = lp_model.with(lhs.clone().eq(equal));
    }
    if let Some(min) = row.bounds.min {
        lp_model = lp_model.with(lhs.clone().geq(min));
    }
    if let Some(max) = row.bounds.max {
        lp_model = lp_model.with(lhs.leq(max));
    }
    lp_model
}
