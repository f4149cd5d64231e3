use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

#[cfg(feature = "coin_cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
#[cfg(feature = "microlp")]
use crate::solver::MicroLpSolver;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::MicroLp => Self::microlp(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// Get the default solver: the first compiled-in of HiGHS, CBC, microlp
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::available_backends()
            .into_iter()
            .next()
            .ok_or_else(|| {
                SolverError::SolverNotAvailable("no solver backend compiled in".to_string())
            })
            .and_then(Self::create_from_backend)
    }

    /// Backends compiled into this build, in order of preference
    pub fn available_backends() -> Vec<SolverBackend> {
        let mut backends = Vec::new();
        if cfg!(feature = "highs") {
            backends.push(SolverBackend::Highs);
        }
        if cfg!(feature = "coin_cbc") {
            backends.push(SolverBackend::CoinCbc);
        }
        if cfg!(feature = "microlp") {
            backends.push(SolverBackend::MicroLp);
        }
        backends
    }

    fn microlp() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "microlp")]
        return Ok(Arc::new(MicroLpSolver::new()));
        #[cfg(not(feature = "microlp"))]
        return Err(not_compiled(SolverBackend::MicroLp, "microlp"));
    }

    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "coin_cbc")]
        return Ok(Arc::new(CoinCbcSolver::new()));
        #[cfg(not(feature = "coin_cbc"))]
        return Err(not_compiled(SolverBackend::CoinCbc, "coin_cbc"));
    }

    fn highs() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "highs")]
        return Ok(Arc::new(HighsSolver::new()));
        #[cfg(not(feature = "highs"))]
        return Err(not_compiled(SolverBackend::Highs, "highs"));
    }
}

#[allow(dead_code)]
fn not_compiled(backend: SolverBackend, feature: &str) -> SolverError {
    SolverError::SolverNotAvailable(format!(
        "{} requires the '{}' feature",
        backend, feature
    ))
}
