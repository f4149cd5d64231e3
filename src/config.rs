// Runtime configuration read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::domain::SolverBackend;

pub const ADDR_VAR: &str = "GRAIN_BLEND_ADDR";
pub const PORT_VAR: &str = "PORT";
pub const SOLVER_VAR: &str = "GRAIN_BLEND_SOLVER";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} is not a valid port: {value}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidSolver { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub address: SocketAddr,
    pub backend: SolverBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            backend: SolverBackend::Auto,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup; `GRAIN_BLEND_ADDR` wins over `PORT`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ADDR_VAR) {
            config.address = value.parse().map_err(|_| ConfigError::InvalidAddress {
                var: ADDR_VAR,
                value,
            })?;
        } else if let Some(value) = lookup(PORT_VAR) {
            let port = value.parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value,
            })?;
            config.address.set_port(port);
        }

        if let Some(value) = lookup(SOLVER_VAR) {
            config.backend = value
                .parse()
                .map_err(|reason| ConfigError::InvalidSolver {
                    var: SOLVER_VAR,
                    reason,
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.address.port(), 3000);
    }

    #[test]
    fn port_and_solver() {
        let config =
            AppConfig::from_lookup(lookup(&[("PORT", "8080"), ("GRAIN_BLEND_SOLVER", "highs")]))
                .unwrap();
        assert_eq!(config.address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.backend, SolverBackend::Highs);
    }

    #[test]
    fn address_overrides_port() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("GRAIN_BLEND_ADDR", "127.0.0.1:50051"),
        ]))
        .unwrap();
        assert_eq!(config.address.to_string(), "127.0.0.1:50051");
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("GRAIN_BLEND_SOLVER", "glpk")])),
            Err(ConfigError::InvalidSolver { .. })
        ));
    }
}
