use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Engine constants. The defaults are the documented design values;
/// overriding them is a deployment decision, not a per-request one.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EngineSettings {
    /// Threshold for matching a MISSING report against a FOUND one.
    #[serde(default = "default_correlation_radius_km")]
    pub correlation_radius_km: f64,
    /// Threshold for alerting nearby users when a MISSING report is created.
    #[serde(default = "default_fanout_radius_km")]
    pub fanout_radius_km: f64,
    /// Multiplier approximating road distance for user-to-user search.
    #[serde(default = "default_circuity_factor")]
    pub circuity_factor: f64,
    /// Period for reseeding the user index from the directory.
    #[serde(default = "default_user_refresh_secs")]
    pub user_refresh_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            correlation_radius_km: default_correlation_radius_km(),
            fanout_radius_km: default_fanout_radius_km(),
            circuity_factor: default_circuity_factor(),
            user_refresh_secs: default_user_refresh_secs(),
        }
    }
}

fn default_correlation_radius_km() -> f64 {
    10.0
}
fn default_fanout_radius_km() -> f64 {
    5.0
}
fn default_circuity_factor() -> f64 {
    1.4
}
fn default_user_refresh_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PETCONNECT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with PETCONNECT_)
            // e.g., PETCONNECT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PETCONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        // DATABASE_URL wins over any file value when set
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PETCONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_constants() {
        let engine = EngineSettings::default();
        assert_eq!(engine.correlation_radius_km, 10.0);
        assert_eq!(engine.fanout_radius_km, 5.0);
        assert_eq!(engine.circuity_factor, 1.4);
        assert_eq!(engine.user_refresh_secs, 30);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
