//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blackjack::{TableConfig, messages::NAME_LEN};
use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    time::Duration,
};

/// Complete server configuration loaded from CLI overrides, environment
/// variables, and defaults (in that order).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Table settings handed to the beacon and every session
    pub table: TableConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional TCP bind address override (from CLI args)
    /// * `udp_port_override` - Optional offer port override (from CLI args)
    /// * `name_override` - Optional server name override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        udp_port_override: Option<u16>,
        name_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = TableConfig::default();

        let tcp_bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_or("BJ_TCP_BIND", defaults.tcp_bind)?,
        };
        let udp_port = match udp_port_override {
            Some(port) => port,
            None => parse_env_or("BJ_UDP_PORT", defaults.udp_port)?,
        };
        let broadcast_addr: IpAddr = parse_env_or("BJ_BROADCAST_ADDR", defaults.broadcast_addr)?;

        let broadcast_interval = Duration::from_millis(parse_env_or(
            "BJ_BROADCAST_INTERVAL_MS",
            defaults.broadcast_interval.as_millis() as u64,
        )?);
        let decision_timeout = Duration::from_secs(parse_env_or(
            "BJ_DECISION_TIMEOUT_SECS",
            defaults.decision_timeout.as_secs(),
        )?);
        let round_pause = Duration::from_millis(parse_env_or(
            "BJ_ROUND_PAUSE_MS",
            defaults.round_pause.as_millis() as u64,
        )?);

        let server_name = name_override
            .or_else(|| std::env::var("BJ_SERVER_NAME").ok())
            .unwrap_or(defaults.server_name);

        Ok(ServerConfig {
            table: TableConfig {
                tcp_bind,
                udp_port,
                broadcast_addr,
                broadcast_interval,
                decision_timeout,
                round_pause,
                server_name,
            },
        })
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns error if a setting would break the protocol or the session
    /// loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        let table = &self.table;

        if table.server_name.is_empty() {
            return Err(ConfigError::Invalid {
                var: "BJ_SERVER_NAME".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        // Longer names would be cut off on the wire
        if table.server_name.len() > NAME_LEN {
            return Err(ConfigError::Invalid {
                var: "BJ_SERVER_NAME".to_string(),
                reason: format!("Must be at most {NAME_LEN} bytes"),
            });
        }

        if table.udp_port == 0 {
            return Err(ConfigError::Invalid {
                var: "BJ_UDP_PORT".to_string(),
                reason: "Must be a fixed port so players can find it".to_string(),
            });
        }

        if table.broadcast_interval.is_zero() {
            return Err(ConfigError::Invalid {
                var: "BJ_BROADCAST_INTERVAL_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if table.decision_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "BJ_DECISION_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback. A variable
/// that is set but unparsable is an error rather than silently ignored.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("{raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            table: TableConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "BJ_UDP_PORT".to_string(),
            reason: "Must be a fixed port".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("BJ_UDP_PORT"));
        assert!(msg.contains("Must be a fixed port"));
    }

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("BJ_UDP_PORT", " 13122 ").unwrap();
        assert_eq!(port, 13122);
        let bind: SocketAddr = parse_value("BJ_TCP_BIND", "0.0.0.0:0").unwrap();
        assert_eq!(bind.port(), 0);

        let err = parse_value::<u16>("BJ_UDP_PORT", "99999").unwrap_err();
        assert!(err.to_string().contains("BJ_UDP_PORT"));
    }

    #[test]
    fn test_config_validation_long_name() {
        let mut config = config();
        config.table.server_name = "x".repeat(NAME_LEN + 1);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        config.table.server_name = "x".repeat(NAME_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = config();
        config.table.broadcast_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = config();
        config.table.decision_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_ephemeral_udp_port() {
        let mut config = config();
        config.table.udp_port = 0;
        assert!(config.validate().is_err());
    }
}
