use tonic::{Request, Response, Status};

use super::blend_service::{BlendError, BlendService};
use super::mappers::{self, grain_blend};
use crate::domain::ObjectiveVariant;
use crate::solver::SolverFactory;

/// gRPC service implementation
pub struct GrpcBlendService {
    service: BlendService,
}

impl GrpcBlendService {
    pub fn new(service: BlendService) -> Self {
        Self { service }
    }

    async fn run(
        &self,
        variant: ObjectiveVariant,
        request: Request<grain_blend::BlendRequest>,
    ) -> Result<Response<grain_blend::BlendResponse>, Status> {
        let request = mappers::proto_to_domain_request(request.into_inner());
        let service = self.service.clone();

        // Solves are CPU-bound and blocking
        let outcome = tokio::task::spawn_blocking(move || service.handle(variant, request))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "solve task panicked");
                Status::internal("Internal server error")
            })?;

        match outcome {
            Ok(response) => Ok(Response::new(mappers::domain_to_proto_response(
                response.result,
            ))),
            Err(err) => Err(to_status(err)),
        }
    }
}

fn to_status(err: BlendError) -> Status {
    if err.is_client_error() {
        Status::invalid_argument(err.to_string())
    } else {
        tracing::error!(error = %err, "blend failed");
        Status::internal("Internal server error")
    }
}

#[tonic::async_trait]
impl grain_blend::grain_blender_server::GrainBlender for GrpcBlendService {
    async fn solve(
        &self,
        request: Request<grain_blend::BlendRequest>,
    ) -> Result<Response<grain_blend::BlendResponse>, Status> {
        self.run(ObjectiveVariant::Slack, request).await
    }

    async fn maximize_lots(
        &self,
        request: Request<grain_blend::BlendRequest>,
    ) -> Result<Response<grain_blend::BlendResponse>, Status> {
        self.run(ObjectiveVariant::LotCount, request).await
    }

    async fn maximize_age(
        &self,
        request: Request<grain_blend::BlendRequest>,
    ) -> Result<Response<grain_blend::BlendResponse>, Status> {
        self.run(ObjectiveVariant::Recency, request).await
    }

    async fn get_available_solvers(
        &self,
        _request: Request<grain_blend::Empty>,
    ) -> Result<Response<grain_blend::AvailableSolvers>, Status> {
        let solvers = SolverFactory::available_backends()
            .into_iter()
            .filter_map(|backend| SolverFactory::create_from_backend(backend).ok())
            .map(|solver| grain_blend::SolverInfo {
                name: solver.name().to_string(),
                supports_mip: solver.supports_mip(),
                capabilities: vec![
                    "Mixed-Integer Programming".to_string(),
                    "Linear Programming".to_string(),
                ],
            })
            .collect();

        Ok(Response::new(grain_blend::AvailableSolvers { solvers }))
    }
}
