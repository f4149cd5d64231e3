// Blend use case: validate a request, then extract -> build -> solve -> aggregate

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    aggregate, build_model, extract_bounds, BlendResult, BlendSpecification, Grain,
    ObjectiveVariant, SolverError, SolverService,
};

/// Errors surfaced to callers of the blend service
#[derive(Debug, thiserror::Error)]
pub enum BlendError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl BlendError {
    /// Whether the caller is at fault (as opposed to the solver)
    ///
    /// An invalid problem comes from request values the backend cannot
    /// represent, such as a capacity beyond its integer range.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BlendError::MissingField(_)
                | BlendError::InvalidInput(_)
                | BlendError::Solver(SolverError::InvalidProblem(_))
        )
    }
}

/// Inbound request, shared by all three operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendRequest {
    #[serde(default)]
    pub blend_detail: Option<BlendSpecification>,
    #[serde(default)]
    pub grains: Option<Vec<Grain>>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl BlendRequest {
    pub fn new(blend_detail: BlendSpecification, grains: Vec<Grain>, quantity: f64) -> Self {
        Self {
            blend_detail: Some(blend_detail),
            grains: Some(grains),
            quantity: Some(quantity),
        }
    }

    /// Check that every input is present and sane, handing back the parts
    pub fn validate(self) -> Result<(BlendSpecification, Vec<Grain>, f64), BlendError> {
        let blend_detail = self.blend_detail.ok_or(BlendError::MissingField("blendDetail"))?;
        let grains = self.grains.ok_or(BlendError::MissingField("grains"))?;
        let quantity = self
            .quantity
            .filter(|q| *q != 0.0)
            .ok_or(BlendError::MissingField("quantity"))?;

        if !quantity.is_finite() || quantity < 0.0 {
            return Err(BlendError::InvalidInput(format!(
                "quantity must be a positive number, got {}",
                quantity
            )));
        }

        if let Some(grain) = grains.iter().find(|g| !g.qtd.is_finite() || g.qtd < 0.0) {
            return Err(BlendError::InvalidInput(format!(
                "grain {} has invalid qtd {}",
                grain.id, grain.qtd
            )));
        }

        Ok((blend_detail, grains, quantity))
    }
}

/// Outbound response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendResponse {
    pub status: String,
    pub result: BlendResult,
}

impl BlendResponse {
    pub fn success(result: BlendResult) -> Self {
        Self {
            status: "success".to_string(),
            result,
        }
    }
}

/// Runs blends against one solver backend
///
/// Stateless apart from the solver handle; every call builds its own model,
/// so a single service can be shared across threads.
#[derive(Clone)]
pub struct BlendService {
    solver: Arc<dyn SolverService>,
}

impl BlendService {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Validate and run a request
    pub fn handle(
        &self,
        variant: ObjectiveVariant,
        request: BlendRequest,
    ) -> Result<BlendResponse, BlendError> {
        let (spec, grains, quantity) = request.validate()?;
        let result = self.blend(variant, &spec, &grains, quantity)?;
        Ok(BlendResponse::success(result))
    }

    /// Parse a JSON body and run it
    pub fn handle_json(
        &self,
        variant: ObjectiveVariant,
        body: &str,
    ) -> Result<BlendResponse, BlendError> {
        let request: BlendRequest = serde_json::from_str(body)
            .map_err(|e| BlendError::InvalidInput(format!("malformed request body: {}", e)))?;
        self.handle(variant, request)
    }

    /// Core blend, inputs already validated
    pub fn blend(
        &self,
        variant: ObjectiveVariant,
        spec: &BlendSpecification,
        grains: &[Grain],
        quantity: f64,
    ) -> Result<BlendResult, SolverError> {
        let bounds = extract_bounds(spec, quantity);
        tracing::info!(
            %variant,
            grains = grains.len(),
            bounds = bounds.len(),
            quantity,
            solver = self.solver.name(),
            "solving blend"
        );

        let model = build_model(variant, grains, &bounds, quantity);
        let solution = self.solver.solve(&model)?;
        let result = aggregate(&solution, grains);

        if result.optimization_result.feasible {
            tracing::info!(
                %variant,
                objective = result.optimization_result.result,
                total = result.total_quantity_used,
                lots = result.optimization_result.grains_used.len(),
                "blend solved"
            );
        } else {
            tracing::warn!(%variant, quantity, "blend is infeasible");
        }

        Ok(result)
    }

    /// Maximize slack while meeting every bound
    pub fn solve(
        &self,
        spec: &BlendSpecification,
        grains: &[Grain],
        quantity: f64,
    ) -> Result<BlendResult, SolverError> {
        self.blend(ObjectiveVariant::Slack, spec, grains, quantity)
    }

    /// Favor fully consuming many small lots
    pub fn maximize_lots(
        &self,
        spec: &BlendSpecification,
        grains: &[Grain],
        quantity: f64,
    ) -> Result<BlendResult, SolverError> {
        self.blend(ObjectiveVariant::LotCount, spec, grains, quantity)
    }

    /// Favor grains with a higher safra score
    pub fn maximize_age(
        &self,
        spec: &BlendSpecification,
        grains: &[Grain],
        quantity: f64,
    ) -> Result<BlendResult, SolverError> {
        self.blend(ObjectiveVariant::Recency, spec, grains, quantity)
    }
}
