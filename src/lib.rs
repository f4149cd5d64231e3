// Domain layer: Blend models, model building, aggregation
pub mod domain;

// Application layer: Use cases and service orchestration
pub mod application;

// Infrastructure layer: External concerns (gRPC, server)
#[cfg(feature = "server")]
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use domain::{
    BlendModel, BlendResult, BlendSpecification, BoundKind, CharacteristicBound, Grain,
    GrainUsage, Identifier, ObjectiveVariant, OptimizationResult, SolveResult, SolverBackend,
    SolverError, SolverService,
};

pub use application::{BlendError, BlendRequest, BlendResponse, BlendService};

#[cfg(feature = "server")]
pub use application::GrpcBlendService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

pub use solver::SolverFactory;
