// Domain value objects representing core business concepts

use std::fmt;
use std::str::FromStr;

/// Direction of optimization
///
/// Every blend objective is maximized, so this is the only direction a model
/// can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Maximize the objective function
    Maximize,
}

/// Which side of a weighted-average characteristic is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BoundKind {
    /// Weighted sum must be at least the bound (`min_<characteristic>`)
    Min,
    /// Weighted sum must be at most the bound (`max_<characteristic>`)
    Max,
}

impl BoundKind {
    /// Key prefix used by blend specifications
    pub fn prefix(self) -> &'static str {
        match self {
            BoundKind::Min => "min_",
            BoundKind::Max => "max_",
        }
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Min => write!(f, "min"),
            BoundKind::Max => write!(f, "max"),
        }
    }
}

/// What the blend optimizes for, once every bound is met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveVariant {
    /// Maximize slack across the blend
    Slack,
    /// Maximize the number of distinct lots consumed
    LotCount,
    /// Maximize the recency ("safra") score of the blend
    Recency,
}

impl fmt::Display for ObjectiveVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveVariant::Slack => write!(f, "Slack"),
            ObjectiveVariant::LotCount => write!(f, "Lot Count"),
            ObjectiveVariant::Recency => write!(f, "Recency"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// microlp, pure Rust
    MicroLp,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "microlp"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(SolverBackend::Auto),
            "microlp" => Ok(SolverBackend::MicroLp),
            "coin_cbc" | "cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!("unknown solver backend '{}'", other)),
        }
    }
}
