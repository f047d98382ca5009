use serde::{Deserialize, Serialize};
use tracing::{info, error};

use crate::ws::hub::MIN_QUEUE_CAPACITY;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated. Unset means any origin.
    pub cors_origins: Option<String>,

    /// Directory receiving document snapshots from `POST /save`
    #[serde(default = "default_save_dir")]
    pub save_dir: String,

    /// Frames buffered per connection before the peer is considered gone
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("Configuration loaded successfully");
                config.validate()
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.outbound_queue_capacity < MIN_QUEUE_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "OUTBOUND_QUEUE_CAPACITY must be at least {}",
                MIN_QUEUE_CAPACITY
            )));
        }
        Ok(self)
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins listed in `CORS_ORIGINS`, or `None` when any origin is allowed
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let raw = self.cors_origins.as_deref()?.trim();
        if raw.is_empty() || raw == "*" {
            return None;
        }
        Some(
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        )
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            save_dir: default_save_dir(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_save_dir() -> String {
    "saved".to_string()
}

fn default_outbound_queue_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.server_address(), "0.0.0.0:8000");
        assert_eq!(config.save_dir, "saved");
        assert_eq!(config.outbound_queue_capacity, 256);
        assert!(config.is_development());
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let vars = vec![
            ("PORT".to_string(), "9100".to_string()),
            ("SAVE_DIR".to_string(), "/tmp/snapshots".to_string()),
            ("OUTBOUND_QUEUE_CAPACITY".to_string(), "8".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.save_dir, "/tmp/snapshots");
        assert_eq!(config.outbound_queue_capacity, 8);
    }

    #[test]
    fn zero_queue_capacity_is_rejected() {
        let config = Config { outbound_queue_capacity: 0, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn queue_capacity_must_hold_init_and_presence() {
        let config = Config { outbound_queue_capacity: 1, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config { outbound_queue_capacity: 2, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let mut config = Config::default();
        assert_eq!(config.allowed_origins(), None);

        config.cors_origins = Some("*".to_string());
        assert_eq!(config.allowed_origins(), None);

        config.cors_origins = Some("http://a.test, http://b.test,".to_string());
        assert_eq!(
            config.allowed_origins(),
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }
}
