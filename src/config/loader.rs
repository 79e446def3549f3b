use crate::config::schema::StoreConfig;
use crate::error::MemoryError;
use crate::memory::ActivityPolicy;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
static CONFIG_TEST_ENV_LOCK: Mutex<()> = Mutex::new(());

pub const ENV_MAX_HISTORY: &str = "MINIMEM_MAX_HISTORY";
pub const ENV_TTL_SECS: &str = "MINIMEM_TTL_SECS";
pub const ENV_ACTIVITY_POLICY: &str = "MINIMEM_ACTIVITY_POLICY";
pub const ENV_SWEEP_INTERVAL_SECS: &str = "MINIMEM_SWEEP_INTERVAL_SECS";

/// Values passed on the command line; `None` leaves the lower layers in place
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_history: Option<usize>,
    pub ttl_secs: Option<u64>,
    pub activity_policy: Option<ActivityPolicy>,
    pub sweep_interval_secs: Option<u64>,
}

pub fn load_config(
    overrides: &ConfigOverrides,
    cli_config_path: Option<PathBuf>,
) -> Result<StoreConfig> {
    tracing::debug!("Loading configuration");

    let mut config = StoreConfig::default();

    // Layer 1: config file (~/.minimem/config.json unless --config is given)
    let config_file = cli_config_path.or_else(get_default_config_path);

    if let Some(ref path) = config_file {
        if path.exists() {
            tracing::debug!(config_path = %path.display(), "Loading configuration from file");
            config = read_config_file(path)?;
        } else {
            tracing::debug!(config_path = %path.display(), "Config file not found, using defaults");
        }
    }

    // Layer 2: environment variables
    config = merge_env_variables(config);

    // Layer 3: CLI flags (highest precedence)
    apply_overrides(&mut config, overrides);

    tracing::debug!(
        max_history = config.max_history,
        ttl_secs = config.ttl_secs,
        activity_policy = %config.activity_policy,
        sweep_interval_secs = config.sweep_interval_secs,
        "Configuration loaded successfully"
    );

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<StoreConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| MemoryError::io(path, e))
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: StoreConfig = serde_json::from_str(&content)
        .map_err(MemoryError::from)
        .with_context(|| format!("Configuration file {:?} contains invalid JSON", path))?;

    Ok(config)
}

fn merge_env_variables(config: StoreConfig) -> StoreConfig {
    merge_env_from(config, |key| std::env::var(key).ok())
}

fn merge_env_from(config: StoreConfig, lookup: impl Fn(&str) -> Option<String>) -> StoreConfig {
    StoreConfig {
        max_history: parse_env(&lookup, ENV_MAX_HISTORY).unwrap_or(config.max_history),
        ttl_secs: parse_env(&lookup, ENV_TTL_SECS).unwrap_or(config.ttl_secs),
        activity_policy: parse_env(&lookup, ENV_ACTIVITY_POLICY)
            .unwrap_or(config.activity_policy),
        sweep_interval_secs: parse_env(&lookup, ENV_SWEEP_INTERVAL_SECS)
            .unwrap_or(config.sweep_interval_secs),
    }
}

/// Reads and parses one variable, ignoring empty or malformed values
fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key).filter(|v| !v.trim().is_empty())?;
    match raw.trim().parse::<T>() {
        Ok(value) => {
            tracing::debug!(variable = key, "Applying environment override");
            Some(value)
        }
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

fn apply_overrides(config: &mut StoreConfig, overrides: &ConfigOverrides) {
    if let Some(max_history) = overrides.max_history {
        config.max_history = max_history;
    }
    if let Some(ttl_secs) = overrides.ttl_secs {
        config.ttl_secs = ttl_secs;
    }
    if let Some(policy) = overrides.activity_policy {
        config.activity_policy = policy;
    }
    if let Some(interval) = overrides.sweep_interval_secs {
        config.sweep_interval_secs = interval;
    }
}

pub fn save_config(config: &StoreConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))?;

    tracing::info!("Configuration saved to {:?}", path);
    Ok(())
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".minimem").join("config.json"))
}

pub fn get_config_path() -> Option<PathBuf> {
    get_default_config_path()
}
