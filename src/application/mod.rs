// Application layer: Use cases and transport adapters

pub mod blend_service;
#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

pub use blend_service::{BlendError, BlendRequest, BlendResponse, BlendService};
#[cfg(feature = "server")]
pub use grpc_service::GrpcBlendService;
