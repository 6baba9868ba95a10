//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{
    RosdockConfig, apply_config_value, validate_config_key, validate_config_value,
};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<RosdockConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// written.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<RosdockConfig> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
