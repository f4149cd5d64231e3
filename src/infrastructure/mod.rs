// Infrastructure layer: gRPC server

pub mod server;

pub use server::{start_server, ServerConfig};
