//! Configuration management for Parceltrack
//!
//! Loads and saves the JSON configuration: tracking messages, the
//! intercity carrier network, support routing and logging.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, data_dir};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tracking store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Message returned when a parcel has no history
    #[serde(default = "default_not_found_message")]
    pub not_found_message: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            not_found_message: default_not_found_message(),
        }
    }
}

fn default_not_found_message() -> String {
    "No tracking information available".to_string()
}

/// One intercity carrier route, usable in both directions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub cost_mad: u32,
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

impl RouteConfig {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        distance_km: f64,
        duration_hours: f64,
        cost_mad: u32,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            distance_km,
            duration_hours,
            cost_mad,
            frequency: frequency.into(),
        }
    }
}

fn default_frequency() -> String {
    "daily".to_string()
}

/// Intercity carrier network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_carrier")]
    pub carrier: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            carrier: default_carrier(),
            routes: default_routes(),
        }
    }
}

fn default_carrier() -> String {
    "CTM".to_string()
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("Casablanca", "Rabat", 90.0, 1.5, 50, "hourly"),
        RouteConfig::new("Casablanca", "Marrakech", 240.0, 3.0, 80, "every_2h"),
        RouteConfig::new("Rabat", "Fes", 200.0, 2.5, 70, "every_2h"),
        RouteConfig::new("Marrakech", "Agadir", 250.0, 3.5, 90, "daily"),
    ]
}

/// Customer support routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportConfig {
    /// Channel that receives tracking notices
    #[serde(default = "default_notice_channel")]
    pub notice_channel: String,
    /// Team that receives escalated issues
    #[serde(default = "default_escalate_to")]
    pub escalate_to: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            notice_channel: default_notice_channel(),
            escalate_to: default_escalate_to(),
        }
    }
}

fn default_notice_channel() -> String {
    "support".to_string()
}

fn default_escalate_to() -> String {
    "city_ops".to_string()
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriber filter directive, used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub support: SupportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location, using defaults if the file is absent
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("Loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to {:?}", path);

        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Intercity carrier name
    pub fn carrier(&self) -> &str {
        &self.network.carrier
    }

    /// Log filter directive
    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

/// Write a default config if none exists, then load it
pub async fn init() -> Result<Config> {
    init_at(&config_path()).await
}

/// Write a default config at `path` if none exists, then load it
pub async fn init_at(path: &Path) -> Result<Config> {
    if path.exists() {
        warn!("Config already exists at {:?}", path);
    } else {
        Config::default().save_to(path).await?;
        info!("Config created at {:?}", path);
    }

    Config::load_from(path).await
}
