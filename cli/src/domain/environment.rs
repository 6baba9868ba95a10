//! The environment handed to every child process.
//!
//! Pure functions only: values are discovered elsewhere and passed in.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::error::ResolutionError;

pub const CONTAINER_HOST: &str = "CONTAINER_HOST";
pub const CONTAINER_RUNTIME: &str = "CONTAINER_RUNTIME";
pub const CONTAINER_UID: &str = "CONTAINER_UID";
pub const CONTAINER_USER: &str = "CONTAINER_USER";
pub const DISPLAY: &str = "DISPLAY";
pub const IMAGE_TAG: &str = "IMAGE_TAG";
/// Silences `docker scan` suggestions after builds.
pub const DOCKER_SCAN_SUGGEST: &str = "DOCKER_SCAN_SUGGEST";

/// Runtime preferred over the engine default when advertised.
pub const ACCELERATED_RUNTIME: &str = "nvidia";

/// Variables added on top of the inherited environment of a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap(BTreeMap<String, String>);

impl EnvironmentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `KEY=value` lines in key order.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

impl FromIterator<(String, String)> for EnvironmentMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Host identity values as read from the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentityValues {
    pub user: String,
    pub uid: u32,
    pub hostname: String,
}

/// Assemble the fixed key set.
#[must_use]
pub fn build_environment(
    host: &HostIdentityValues,
    runtime: &str,
    display: &str,
    tag: &str,
) -> EnvironmentMap {
    let mut env = EnvironmentMap::new();
    env.insert(CONTAINER_HOST, host.hostname.as_str());
    env.insert(CONTAINER_RUNTIME, runtime);
    env.insert(CONTAINER_UID, host.uid.to_string());
    env.insert(CONTAINER_USER, host.user.as_str());
    env.insert(DOCKER_SCAN_SUGGEST, "false");
    env.insert(IMAGE_TAG, tag);
    env.insert(DISPLAY, display);
    env
}

#[derive(Deserialize)]
struct EngineInfo {
    #[serde(rename = "Runtimes", default)]
    runtimes: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "DefaultRuntime")]
    default_runtime: String,
}

/// Pick the container runtime from `docker info --format={{json .}}` output.
///
/// # Errors
///
/// Returns [`ResolutionError::RuntimeParse`] if the JSON is malformed or has no
/// `DefaultRuntime`.
pub fn select_runtime(info_json: &[u8]) -> Result<String> {
    let info: EngineInfo = serde_json::from_slice(info_json)
        .map_err(|e| ResolutionError::RuntimeParse(e.to_string()))?;
    if info.runtimes.contains_key(ACCELERATED_RUNTIME) {
        Ok(ACCELERATED_RUNTIME.to_string())
    } else {
        Ok(info.default_runtime)
    }
}

/// Parse the output of `env` into a map. Lines without `=` are continuation
/// lines of multi-line values and are skipped.
#[must_use]
pub fn parse_env_dump(dump: &str) -> EnvironmentMap {
    dump.lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| !k.is_empty() && !k.contains(char::is_whitespace))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
