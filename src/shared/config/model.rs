use std::env;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reduce: ReduceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Group cap used when the caller does not pass one (negative = unbounded)
    pub default_max_groups: i64,
    /// Rows processed between two cancellation checks inside one partial
    pub cancel_check_rows: usize,
    /// Worker threads for the parallel reduce (0 = rayon's global pool)
    pub parallelism: usize,
    /// Below this many partials the parallel reduce runs sequentially
    pub parallel_min_partials: usize,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            default_max_groups: -1,
            cancel_check_rows: 4096,
            parallelism: 0,
            parallel_min_partials: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            stdout_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path =
        env::var("GROUP_REDUCE_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path).required(false))
        .add_source(config::Environment::with_prefix("GROUP_REDUCE").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

/// Loads settings from one explicit file, without environment overrides.
pub fn load_settings_from(path: &Path) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize()
}
