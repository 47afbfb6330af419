use persistence::{StorageConfig, StorageKind};
use serde::Deserialize;
use shared::geodesy::Coordinate;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    pub storage: StorageSettings,
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// `memory` or `file`
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Directory holding one JSON file per collection (file backend only)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Seconds between tracking ticks
    #[serde(default = "default_tracking_interval")]
    pub interval_secs: u64,

    /// `simulated` or `device`
    #[serde(default = "default_ingestion")]
    pub ingestion: String,

    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,

    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,

    /// Register a demo chip on startup when no chips exist
    #[serde(default = "default_seed_demo_chip")]
    pub seed_demo_chip: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

/// How location fixes enter the tracking pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionMode {
    Simulated,
    Device,
}

impl std::str::FromStr for IngestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulated" => Ok(IngestionMode::Simulated),
            "device" => Ok(IngestionMode::Device),
            other => Err(format!("unknown ingestion mode '{}'", other)),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_storage_backend() -> String {
    "file".to_string()
}
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_tracking_interval() -> u64 {
    30
}
fn default_ingestion() -> String {
    "simulated".to_string()
}
fn default_fallback_latitude() -> f64 {
    19.4326
}
fn default_fallback_longitude() -> f64 {
    -99.1332
}
fn default_seed_demo_chip() -> bool {
    true
}
fn default_cleanup_interval() -> u64 {
    60
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PT__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PT").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// This method creates a config entirely from defaults and overrides,
    /// without relying on config files (which may not be accessible during tests).
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [storage]
            backend = "memory"
            data_dir = "data"

            [tracking]
            interval_secs = 30
            ingestion = "simulated"
            fallback_latitude = 19.4326
            fallback_longitude = -99.1332
            seed_demo_chip = true

            [alerts]
            cleanup_interval_minutes = 60
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.tracking.interval_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "tracking.interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.alerts.cleanup_interval_minutes == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "alerts.cleanup_interval_minutes must be greater than 0".to_string(),
            ));
        }

        self.storage_kind()?;
        self.ingestion_mode()?;

        if !(-90.0..=90.0).contains(&self.tracking.fallback_latitude) {
            return Err(ConfigValidationError::InvalidValue(
                "tracking.fallback_latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.tracking.fallback_longitude) {
            return Err(ConfigValidationError::InvalidValue(
                "tracking.fallback_longitude must be between -180 and 180".to_string(),
            ));
        }

        self.socket_addr().map_err(|e| {
            ConfigValidationError::InvalidValue(format!("Invalid server address: {}", e))
        })?;

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn storage_kind(&self) -> Result<StorageKind, ConfigValidationError> {
        self.storage
            .backend
            .parse()
            .map_err(ConfigValidationError::InvalidValue)
    }

    pub fn storage_config(&self) -> Result<StorageConfig, ConfigValidationError> {
        Ok(StorageConfig {
            kind: self.storage_kind()?,
            data_dir: PathBuf::from(&self.storage.data_dir),
        })
    }

    pub fn ingestion_mode(&self) -> Result<IngestionMode, ConfigValidationError> {
        self.tracking
            .ingestion
            .parse()
            .map_err(ConfigValidationError::InvalidValue)
    }

    pub fn fallback_coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.tracking.fallback_latitude,
            self.tracking.fallback_longitude,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.tracking.interval_secs, 30);
        assert_eq!(config.storage_kind().unwrap(), StorageKind::Memory);
        assert_eq!(config.ingestion_mode().unwrap(), IngestionMode::Simulated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_env_override() {
        let config = Config::load_for_test(&[
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("tracking.ingestion", "device"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.ingestion_mode().unwrap(), IngestionMode::Device);
    }

    #[test]
    fn test_config_validation_zero_port() {
        let config = Config::load_for_test(&[("server.port", "0")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("port"));
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let config = Config::load_for_test(&[("tracking.interval_secs", "0")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("interval_secs"));
    }

    #[test]
    fn test_config_validation_unknown_backend() {
        let config = Config::load_for_test(&[("storage.backend", "postgres")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("postgres"));
    }

    #[test]
    fn test_config_validation_unknown_ingestion() {
        let config = Config::load_for_test(&[("tracking.ingestion", "gps")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_fallback_out_of_range() {
        let config = Config::load_for_test(&[("tracking.fallback_latitude", "91.0")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("fallback_latitude"));

        let config = Config::load_for_test(&[("tracking.fallback_longitude", "-181.0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[
            ("server.host", "127.0.0.1"),
            ("server.port", "3000"),
        ])
        .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_storage_config_paths() {
        let config = Config::load_for_test(&[
            ("storage.backend", "file"),
            ("storage.data_dir", "/var/lib/pet-tracker"),
        ])
        .unwrap();
        let storage = config.storage_config().unwrap();
        assert_eq!(storage.kind, StorageKind::File);
        assert_eq!(storage.data_dir, PathBuf::from("/var/lib/pet-tracker"));
    }

    #[test]
    fn test_fallback_coordinate() {
        let config = Config::load_for_test(&[]).unwrap();
        let fallback = config.fallback_coordinate();
        assert_eq!(fallback.latitude, 19.4326);
        assert_eq!(fallback.longitude, -99.1332);
    }
}
