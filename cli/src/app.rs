//! Application context: unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern (e.g. `--verbose`) requires only one
//! field change here; command signatures stay the same.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{PackageLayout, RosdockConfig};
use crate::infra::config::{YamlConfigStore, rosdock_home};
use crate::infra::prompt::DialoguerPrompter;
use crate::output::OutputContext;

/// Sentinel under the repository root that disables the display check.
pub const SKIP_DISPLAY_SENTINEL: &str = ".rosdock/skip-display-check";

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `ROSDOCK_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Configuration persistence.
    pub config_store: YamlConfigStore,
    /// Configuration as loaded at startup.
    pub config: RosdockConfig,
    /// Repository root holding `noetic/<tag>/`.
    pub root: PathBuf,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `ROSDOCK_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and the loaded
    /// configuration.
    #[must_use]
    pub fn new(flags: &AppFlags, config: RosdockConfig, root: PathBuf) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("ROSDOCK_YES").is_ok();
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config_store: YamlConfigStore,
            config,
            root,
            non_interactive: flags.behaviour.yes || ci_env,
        }
    }

    /// Prompter honouring `non_interactive`.
    #[must_use]
    pub fn prompter(&self) -> DialoguerPrompter {
        DialoguerPrompter::new(self.non_interactive)
    }

    /// Package checkout locations under the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn layout(&self) -> Result<PackageLayout> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(PackageLayout::new(
            home,
            &self.config.packages.workspace_dir,
            &self.config.packages.standalone_dir,
        ))
    }

    /// Where failed build logs are written.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(rosdock_home()?.join("logs"))
    }

    #[must_use]
    pub fn skip_display_file(&self) -> PathBuf {
        self.root.join(SKIP_DISPLAY_SENTINEL)
    }
}

/// Load the configuration file, or defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<RosdockConfig> {
    YamlConfigStore.load()
}

/// Repository root: `ROSDOCK_ROOT`, then the configured root, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory is unavailable.
pub fn resolve_root(config: &RosdockConfig) -> Result<PathBuf> {
    if let Some(root) = std::env::var_os("ROSDOCK_ROOT").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    if let Some(root) = &config.root {
        return Ok(root.clone());
    }
    std::env::current_dir().context("cannot determine current directory")
}

/// Command run inside the container to build packages: this binary if it
/// lives under the repository root (and is therefore mounted), else
/// `rosdock` from the container's `PATH`.
#[must_use]
pub fn container_entrypoint(root: &Path) -> String {
    std::env::current_exe()
        .ok()
        .zip(root.canonicalize().ok())
        .filter(|(exe, root)| exe.starts_with(root))
        .map_or_else(
            || "rosdock".to_string(),
            |(exe, _)| exe.to_string_lossy().into_owned(),
        )
}
