//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It provides a centralized way to configure the home location, the published sensor,
//! the BOM data source and the refresh/poll schedule.

use crate::TideError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Application configuration loaded from tide-config.toml
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Home coordinate and time zone
    pub location: LocationConfig,
    /// Published sensor identity and station override
    pub sensor: SensorConfig,
    /// BOM tide table source
    pub source: SourceConfig,
    /// Refresh and poll timing
    pub schedule: ScheduleConfig,
}

/// Reference point used to pick the nearest station
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Latitude in decimal degrees (negative south)
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east)
    pub longitude: f64,
    /// IANA time zone passed to BOM (e.g. "Australia/Sydney")
    pub time_zone: String,
}

/// Sensor identity as seen by the state sink
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SensorConfig {
    /// Entity the readings are published under
    pub entity_id: String,
    /// Optional display name published as `friendly_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Station AAC code overriding nearest-station selection (e.g. "NSW_TP007")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tide_location: Option<String>,
}

/// Tide table source settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Scheme and host of the BOM site
    pub base_url: String,
    /// Days of predictions per request, starting yesterday
    pub days: u32,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Refresh and poll timing
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Seconds between readings
    pub poll_interval_secs: u64,
    /// Delay before the first reading after startup
    pub startup_delay_secs: u64,
    /// Local wall-clock time of the nightly refresh ("HH:MM:SS")
    pub nightly_refresh: String,
    /// Upper bound on a single poll, including a first-use refresh
    pub poll_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                latitude: -33.8688,
                longitude: 151.2093,
                time_zone: "Australia/Sydney".to_string(),
            },
            sensor: SensorConfig {
                entity_id: "sensor.tide".to_string(),
                friendly_name: Some("Next Tide".to_string()),
                tide_location: None,
            },
            source: SourceConfig {
                base_url: crate::tide_data::DEFAULT_BASE_URL.to_string(),
                days: 3,
                timeout_secs: 30,
            },
            schedule: ScheduleConfig {
                poll_interval_secs: 360,
                startup_delay_secs: 10,
                nightly_refresh: "00:00:05".to_string(),
                poll_timeout_secs: 60,
            },
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.as_ref().display(),
                        latitude = config.location.latitude,
                        longitude = config.location.longitude,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(error = %e, "Invalid config file format, using defaults (Sydney)");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    path = %path.as_ref().display(),
                    "No config file found, using defaults (Sydney)"
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TideError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| TideError::Config(e.to_string()))?;
        fs::write(&path, contents).map_err(|e| TideError::Config(e.to_string()))?;
        info!(path = %path.as_ref().display(), "Configuration saved");
        Ok(())
    }

    /// Reference `(latitude, longitude)` for station resolution
    pub fn reference(&self) -> (f64, f64) {
        (self.location.latitude, self.location.longitude)
    }
}

impl ScheduleConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}
