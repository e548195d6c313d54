//! # Configuration Management
//!
//! Structured configuration for listeners and connectors.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Direct instantiation with defaults
//!
//! The wire-protocol constants live in [`crate::core::frame`]; nothing here
//! changes the frame layout.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ProtocolError, Result};

/// Top-level configuration for a process using this crate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    /// Listener-side configuration
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Connector-side configuration
    #[serde(default)]
    pub connector: ConnectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NetworkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot work at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.listener.bind_addr.is_empty() {
            return Err(ProtocolError::ConfigError(
                "listener.bind_addr must not be empty".to_owned(),
            ));
        }
        if self.connector.port == 0 {
            return Err(ProtocolError::ConfigError(
                "connector.port must not be 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Where the acceptor binds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Bind address; port 0 asks the OS for a free port.
    pub bind_addr: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:0".to_owned(),
        }
    }
}

/// Where the connector dials.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 7777,
        }
    }
}

/// Logging configuration consumed by the embedding application; the library
/// itself only emits `tracing` events.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter: "trace", "debug", "info", "warn", or "error".
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = NetworkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_full_toml() {
        let config = NetworkConfig::from_toml(
            r#"
            [listener]
            bind_addr = "127.0.0.1:9000"

            [connector]
            host = "example.net"
            port = 9000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.connector.host, "example.net");
        assert_eq!(config.connector.port, 9000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = NetworkConfig::from_toml("").unwrap();
        assert_eq!(config.connector.port, 7777);
    }

    #[test]
    fn zero_connector_port_rejected() {
        let result = NetworkConfig::from_toml(
            r#"
            [connector]
            host = "example.net"
            port = 0
            "#,
        );
        assert!(matches!(result, Err(ProtocolError::ConfigError(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            NetworkConfig::from_toml("not toml ["),
            Err(ProtocolError::ConfigError(_))
        ));
    }
}
