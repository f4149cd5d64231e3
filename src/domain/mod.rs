// Domain module: Blend models, model construction and result aggregation

pub mod aggregator;
pub mod bounds;
pub mod model_builder;
pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use aggregator::aggregate;
pub use bounds::extract_bounds;
pub use model_builder::build_model;
pub use models::*;
pub use solver_service::*;
pub use value_objects::*;
