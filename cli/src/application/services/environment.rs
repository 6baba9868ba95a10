//! Application service: child-process environment resolution.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{
    ContainerEngine, DisplayProber, HostIdentity, LocalFs, ProgressReporter, Prompter,
};
use crate::domain::display::{
    CANDIDATES, IGNORE_DEFAULT, IGNORE_PROMPT, IgnoreChoice, NO_DISPLAY, display_name,
    no_display_warning, parse_ignore_choice, tool_missing_warning,
};
use crate::domain::environment::{EnvironmentMap, build_environment, select_runtime};
use crate::domain::{BuildConfig, ResolutionError};

/// Collaborators needed to pick a `DISPLAY` value.
pub struct DisplayCheck<'a, D, P, F, R> {
    pub prober: &'a D,
    pub prompter: &'a P,
    pub fs: &'a F,
    pub reporter: &'a R,
    /// Sentinel file; when present the check is skipped.
    pub skip_file: &'a Path,
}

/// Build the environment for every child process of this invocation.
///
/// `DISPLAY` is only probed when `config.requires_display` is set; otherwise
/// it is empty and the prober is never touched.
///
/// # Errors
///
/// Returns a [`ResolutionError`] if the container runtime cannot be
/// determined or the user declines to continue without a display.
pub async fn resolve_environment(
    config: &BuildConfig,
    host: &impl HostIdentity,
    engine: &impl ContainerEngine,
    display: &DisplayCheck<'_, impl DisplayProber, impl Prompter, impl LocalFs, impl ProgressReporter>,
) -> Result<EnvironmentMap> {
    let identity = host.identity();
    let runtime = resolve_runtime(engine).await?;

    let display_value = if config.requires_display {
        resolve_display(display, &identity.hostname).await?
    } else {
        NO_DISPLAY.to_string()
    };

    Ok(build_environment(
        &identity,
        &runtime,
        &display_value,
        config.tag.as_str(),
    ))
}

/// Ask the engine which runtime to use, preferring a GPU runtime.
///
/// # Errors
///
/// Returns [`ResolutionError::RuntimeQuery`] if the engine cannot be queried
/// and [`ResolutionError::RuntimeParse`] if its answer is unreadable.
pub async fn resolve_runtime(engine: &impl ContainerEngine) -> Result<String> {
    let output = engine
        .info()
        .await
        .map_err(|e| ResolutionError::RuntimeQuery(format!("{e:#}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ResolutionError::RuntimeQuery(stderr.trim().to_string()).into());
    }
    select_runtime(&output.stdout)
}

/// Find a usable X display, or learn from the user that none is needed.
///
/// # Errors
///
/// Returns a [`ResolutionError`] if no display is usable and the user
/// chooses to stop, or if the skip sentinel cannot be written.
pub async fn resolve_display(
    check: &DisplayCheck<'_, impl DisplayProber, impl Prompter, impl LocalFs, impl ProgressReporter>,
    hostname: &str,
) -> Result<String> {
    if check.fs.exists(check.skip_file) {
        check.reporter.step("Skipping DISPLAY check.");
        return Ok(NO_DISPLAY.to_string());
    }

    if !check.prober.is_available() {
        check.reporter.alert(&tool_missing_warning());
        return ask_to_ignore(check, ResolutionError::ProbeToolMissing);
    }

    for num in CANDIDATES {
        let name = display_name(num);
        if check.prober.probe(&name).await {
            tracing::debug!(display = %name, "display probe succeeded");
            return Ok(name);
        }
    }

    check.reporter.alert(&no_display_warning(hostname));
    ask_to_ignore(check, ResolutionError::NoDisplay)
}

fn ask_to_ignore(
    check: &DisplayCheck<'_, impl DisplayProber, impl Prompter, impl LocalFs, impl ProgressReporter>,
    abort: ResolutionError,
) -> Result<String> {
    let answer = check.prompter.ask(IGNORE_PROMPT, IGNORE_DEFAULT)?;
    match parse_ignore_choice(&answer) {
        IgnoreChoice::Always => {
            if let Some(parent) = check.skip_file.parent() {
                check.fs.create_dir_all(parent)?;
            }
            check
                .fs
                .write(check.skip_file, "")
                .context("recording the display check opt-out")?;
            Ok(NO_DISPLAY.to_string())
        }
        IgnoreChoice::Once => Ok(NO_DISPLAY.to_string()),
        IgnoreChoice::Abort => Err(abort.into()),
    }
}
