// Infrastructure: Server setup and configuration
// Single Responsibility: Manage server lifecycle and configuration

use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;

use crate::application::mappers::grain_blend::grain_blender_server::GrainBlenderServer;
use crate::application::{BlendService, GrpcBlendService};
use crate::config::AppConfig;
use crate::domain::solver_service::{Result as SolverResult, SolverService};
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub solver: Arc<dyn SolverService>,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, solver: Arc<dyn SolverService>) -> Self {
        Self { address, solver }
    }

    /// Resolve the configured backend into a solver
    pub fn from_app_config(config: &AppConfig) -> SolverResult<Self> {
        let solver = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self::new(config.address, solver))
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = GrpcBlendService::new(BlendService::new(config.solver.clone()));

    tracing::info!(
        address = %config.address,
        solver = config.solver.name(),
        "grain blend server listening"
    );

    Server::builder()
        .add_service(GrainBlenderServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
