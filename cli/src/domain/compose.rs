//! Minimal reading of a tag's `compose.yaml`.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Deserialize)]
struct ComposeFile {
    #[serde(default)]
    services: serde_yaml::Mapping,
}

/// Name of the first service declared in a compose file, in file order.
///
/// Returns `Ok(None)` when the file declares no services.
///
/// # Errors
///
/// Returns an error if the content is not valid YAML.
pub fn primary_service(content: &str) -> Result<Option<String>> {
    let file: ComposeFile = serde_yaml::from_str(content).context("parsing compose file")?;
    Ok(file
        .services
        .keys()
        .find_map(|k| k.as_str().map(str::to_owned)))
}
