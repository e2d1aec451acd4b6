//! Server configuration module.
//!
//! This module provides configuration loading for the directory server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `DIRECTORY_LISTEN_PORT`: Port to listen on (default: `5000`)
//! - `DIRECTORY_MINIMUM_DEGREE`: Minimum degree `t` of the B-tree (default: `3`)
//! - `DIRECTORY_SEED_FILE`: JSON file of example providers to load at startup (optional)
//!
//! # Invariants
//!
//! - `minimum_degree` is always at least 2
//! - `listen_port` is always a valid port number

use std::path::PathBuf;

use crate::btree::MIN_DEGREE;

const LISTEN_PORT_VAR: &str = "DIRECTORY_LISTEN_PORT";
const MINIMUM_DEGREE_VAR: &str = "DIRECTORY_MINIMUM_DEGREE";
const SEED_FILE_VAR: &str = "DIRECTORY_SEED_FILE";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on for HTTP requests.
    pub listen_port: u16,
    /// Minimum degree of the provider index.
    pub minimum_degree: usize,
    /// Optional JSON file of providers to insert at startup.
    pub seed_file: Option<PathBuf>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: Self::DEFAULT_PORT,
            minimum_degree: Self::DEFAULT_MINIMUM_DEGREE,
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 5000;
    /// Default minimum degree of the B-tree.
    pub const DEFAULT_MINIMUM_DEGREE: usize = 3;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DIRECTORY_LISTEN_PORT` is set but not a valid port number
    /// - `DIRECTORY_MINIMUM_DEGREE` is set but not an integer of at least 2
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of touching the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_port = Self::load_listen_port(lookup(LISTEN_PORT_VAR))?;
        let minimum_degree = Self::load_minimum_degree(lookup(MINIMUM_DEGREE_VAR))?;
        let seed_file = lookup(SEED_FILE_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_port,
            minimum_degree,
            seed_file,
        })
    }

    /// Parse the listen port. Returns the default if not set.
    fn load_listen_port(value: Option<String>) -> Result<u16, ConfigError> {
        match value {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: LISTEN_PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    /// Parse the minimum degree. Returns the default if not set.
    fn load_minimum_degree(value: Option<String>) -> Result<usize, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::DEFAULT_MINIMUM_DEGREE);
        };
        match value.parse::<usize>() {
            Ok(t) if t >= MIN_DEGREE => Ok(t),
            _ => Err(ConfigError::InvalidValue {
                name: MINIMUM_DEGREE_VAR.to_string(),
                message: format!("'{value}' is not an integer of at least {MIN_DEGREE}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        assert_eq!(config_from(&[]), Ok(ServerConfig::default()));
        assert_eq!(ServerConfig::DEFAULT_PORT, 5000);
        assert_eq!(ServerConfig::DEFAULT_MINIMUM_DEGREE, 3);
    }

    #[test]
    fn test_all_values_set() {
        let config = config_from(&[
            ("DIRECTORY_LISTEN_PORT", "8080"),
            ("DIRECTORY_MINIMUM_DEGREE", "4"),
            ("DIRECTORY_SEED_FILE", "providers.json"),
        ])
        .expect("valid config");
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.minimum_degree, 4);
        assert_eq!(config.seed_file, Some(PathBuf::from("providers.json")));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("DIRECTORY_LISTEN_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "DIRECTORY_LISTEN_PORT"));
    }

    #[test]
    fn test_minimum_degree_below_two() {
        for bad in ["1", "0", "-3", "three"] {
            let err = config_from(&[("DIRECTORY_MINIMUM_DEGREE", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "DIRECTORY_MINIMUM_DEGREE"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_seed_file_is_ignored() {
        let config = config_from(&[("DIRECTORY_SEED_FILE", "")]).expect("valid config");
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn test_config_error_display_invalid() {
        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }
}
