use serde::Deserialize;
use std::net::SocketAddr;

use crate::service::DEFAULT_EVENT_CAPACITY;

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub events: EventConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Background sensor simulation (demo mode)
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between simulated readings
    #[serde(default = "default_simulation_interval")]
    pub interval_seconds: u64,
}

fn default_simulation_interval() -> u64 {
    5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_simulation_interval(),
        }
    }
}

/// Event broadcast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Events buffered per subscriber before it starts lagging
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl OfficeConfig {
    /// Override from env vars. Unparsable values are ignored.
    pub fn apply_env(mut self) -> Self {
        if let Ok(v) = std::env::var("SMART_OFFICE_HOST") {
            if !v.is_empty() {
                self.server.host = v;
            }
        }
        if let Ok(v) = std::env::var("SMART_OFFICE_PORT") {
            if let Ok(n) = v.parse::<u16>() {
                self.server.port = n;
            }
        }
        if let Ok(v) = std::env::var("SMART_OFFICE_SIMULATION") {
            if let Ok(b) = v.parse::<bool>() {
                self.simulation.enabled = b;
            }
        }
        if let Ok(v) = std::env::var("SMART_OFFICE_SIMULATION_INTERVAL_SECONDS") {
            if let Ok(n) = v.parse::<u64>() {
                self.simulation.interval_seconds = n;
            }
        }

        self
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<OfficeConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: OfficeConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = OfficeConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(!config.simulation.enabled);
        assert_eq!(config.simulation.interval_seconds, 5);
        assert_eq!(config.events.channel_capacity, 256);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [simulation]
            enabled = true
            interval_seconds = 2

            [events]
            channel_capacity = 32
        "#;

        let config: OfficeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert!(config.simulation.enabled);
        assert_eq!(config.simulation.interval_seconds, 2);
        assert_eq!(config.events.channel_capacity, 32);
    }

    #[test]
    fn test_partial_config() {
        // Missing sections and fields use defaults
        let toml = r#"
            [server]
            port = 3000
        "#;

        let config: OfficeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0"); // Default
        assert!(!config.simulation.enabled); // Default
    }

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
        };
        assert_eq!(server.bind_addr().unwrap().port(), 8081);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.bind_addr().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nenabled = true").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert!(config.simulation.enabled);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/smart-office.toml").is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }
}
