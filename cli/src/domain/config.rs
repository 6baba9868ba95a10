//! Domain types and validators for rosdock configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::git::GitHubProtocol;
use crate::domain::packages::{DEFAULT_STANDALONE_DIR, DEFAULT_WORKSPACE_DIR};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "root",
    "github.protocol",
    "packages.workspace_dir",
    "packages.standalone_dir",
];
pub const VALID_PROTOCOLS: &[&str] = &["ask", "ssh", "https"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.rosdock/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RosdockConfig {
    /// Repository root holding `noetic/<tag>/`. Falls back to the current
    /// directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// GitHub settings.
    pub github: GithubConfig,
    /// Package checkout locations.
    pub packages: PackagesConfig,
}

/// GitHub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Clone protocol: `ask` (default), `ssh`, or `https`.
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
        }
    }
}

fn default_protocol() -> String {
    "ask".to_string()
}

impl GithubConfig {
    /// The configured protocol, or `None` when the user should be asked.
    #[must_use]
    pub fn fixed_protocol(&self) -> Option<GitHubProtocol> {
        match self.protocol.as_str() {
            "ssh" => Some(GitHubProtocol::Ssh),
            "https" => Some(GitHubProtocol::Https),
            _ => None,
        }
    }
}

/// Directories under `$HOME` where dependency packages are cloned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    pub workspace_dir: String,
    pub standalone_dir: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            workspace_dir: DEFAULT_WORKSPACE_DIR.to_string(),
            standalone_dir: DEFAULT_STANDALONE_DIR.to_string(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    match key {
        "github.protocol" if !VALID_PROTOCOLS.contains(&value) => {
            Err(invalid(&VALID_PROTOCOLS.join(", ")).into())
        }
        "packages.workspace_dir" | "packages.standalone_dir"
            if value.is_empty() || value.contains('/') =>
        {
            Err(invalid("a single directory name under $HOME").into())
        }
        "root" if value.is_empty() => Err(invalid("a directory path").into()),
        _ => Ok(()),
    }
}

/// Apply an already-validated `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown.
pub fn apply_config_value(config: &mut RosdockConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "root" => config.root = Some(PathBuf::from(value)),
        "github.protocol" => config.github.protocol = value.to_string(),
        "packages.workspace_dir" => config.packages.workspace_dir = value.to_string(),
        "packages.standalone_dir" => config.packages.standalone_dir = value.to_string(),
        _ => validate_config_key(key)?,
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
