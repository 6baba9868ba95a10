//! Application service: image build, initial package setup, and launch.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, CommandSpec, ContainerEngine, HookContext, LocalFs, ProgressReporter, Prompter,
    RepoCloner, TagProfile,
};
use crate::application::services::{github, packages};
use crate::domain::build::makefile_arg;
use crate::domain::compose::primary_service;
use crate::domain::{
    BuildConfig, BuildState, ComposeProject, EnvironmentMap, GitHubProtocol, PackageLayout,
    ResolutionError, TagError, exit_code,
};

/// Collaborators for a build.
pub struct BuildPorts<'a, R, E, G, F, P, Q> {
    pub runner: &'a R,
    pub engine: &'a E,
    pub cloner: &'a G,
    pub fs: &'a F,
    pub prompter: &'a P,
    pub reporter: &'a Q,
}

/// Everything one `build` invocation needs to know.
pub struct BuildRequest<'a> {
    pub config: &'a BuildConfig,
    /// Repository root; `make` runs here and the container's workdir is
    /// pinned to it.
    pub root: &'a Path,
    /// Headless environment for all child processes.
    pub env: &'a EnvironmentMap,
    pub project: &'a ComposeProject,
    pub layout: &'a PackageLayout,
    /// Packages and hooks for the tag, if any are registered.
    pub profile: Option<&'a TagProfile>,
    /// Protocol from configuration; `None` asks the user.
    pub protocol: Option<GitHubProtocol>,
    /// Command run inside the container to build packages.
    pub container_command: &'a [String],
}

/// How a build ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub state: BuildState,
    pub exit_code: u8,
}

impl BuildOutcome {
    fn done() -> Self {
        Self {
            state: BuildState::Done,
            exit_code: 0,
        }
    }

    fn failed(status: ExitStatus) -> Self {
        Self {
            state: BuildState::Failed,
            exit_code: exit_code(status.code()),
        }
    }
}

struct Tracker(BuildState);

impl Tracker {
    fn advance(&mut self, next: BuildState) {
        debug_assert!(self.0.can_advance_to(next), "{} -> {next}", self.0);
        tracing::debug!(from = %self.0, to = %next, "build state");
        self.0 = next;
    }
}

/// Build the image and, if requested, clone and build dependency packages.
///
/// With initial setup the container is always stopped once the handoff
/// section is entered, whether it succeeded, returned a failing status, or
/// errored. A failing in-container build's exit code becomes the outcome's
/// exit code.
///
/// # Errors
///
/// Returns an error if a step cannot be run at all (spawn failure, missing
/// profile, authentication or resolution failure).
pub async fn build<R, E, G, F, P, Q>(
    req: &BuildRequest<'_>,
    ports: &BuildPorts<'_, R, E, G, F, P, Q>,
) -> Result<BuildOutcome>
where
    R: CommandRunner,
    E: ContainerEngine,
    G: RepoCloner,
    F: LocalFs,
    P: Prompter,
    Q: ProgressReporter,
{
    let mut state = Tracker(BuildState::Idle);

    state.advance(BuildState::ImageBuilding);
    let status = build_image(req, ports.runner, ports.reporter).await?;
    if !status.success() {
        state.advance(BuildState::Failed);
        return Ok(BuildOutcome::failed(status));
    }
    ports.reporter.success(&format!("Built image {}", req.config.tag));

    if !req.config.with_initial_setup {
        state.advance(BuildState::Done);
        return Ok(BuildOutcome::done());
    }

    let profile = req
        .profile
        .ok_or_else(|| TagError::NoProfile(req.config.tag.to_string()))?;

    let handoff = setup_packages(req, ports, profile, &mut state).await;

    ports.reporter.step(&format!("Stopping {}", req.project.name));
    match ports.engine.stop(req.project, req.env).await {
        Ok(s) if s.success() => {}
        Ok(s) => ports.reporter.warn(&format!(
            "Could not stop {} (exit code {})",
            req.project.name,
            exit_code(s.code())
        )),
        Err(e) => ports
            .reporter
            .warn(&format!("Could not stop {}: {e:#}", req.project.name)),
    }

    let status = match handoff {
        Ok(status) => status,
        Err(e) => {
            state.advance(BuildState::Failed);
            return Err(e);
        }
    };
    if !status.success() {
        state.advance(BuildState::Failed);
        return Ok(BuildOutcome::failed(status));
    }

    if let Some(hook) = profile.post_build {
        hook(&HookContext {
            layout: req.layout,
            fs: ports.fs,
            reporter: ports.reporter,
        })
        .context("post-build step")?;
    }
    ports.reporter.success("Packages built.");
    state.advance(BuildState::Done);
    Ok(BuildOutcome::done())
}

/// `make -f noetic/<tag>/Makefile` from the repository root.
///
/// # Errors
///
/// Returns an error if `make` cannot be spawned.
pub async fn build_image(
    req: &BuildRequest<'_>,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<ExitStatus> {
    reporter.step(&format!("Building image {}", req.config.tag));
    let cmd = CommandSpec::new("make")
        .args(["-f".to_string(), makefile_arg(&req.config.tag)])
        .cwd(req.root)
        .env(req.env);
    runner
        .status(&cmd)
        .await
        .with_context(|| format!("running {}", cmd.display()))
}

/// Host cloning then container handoff. Everything here runs before the
/// caller's unconditional stop.
async fn setup_packages<R, E, G, F, P, Q>(
    req: &BuildRequest<'_>,
    ports: &BuildPorts<'_, R, E, G, F, P, Q>,
    profile: &TagProfile,
    state: &mut Tracker,
) -> Result<ExitStatus>
where
    R: CommandRunner,
    E: ContainerEngine,
    G: RepoCloner,
    F: LocalFs,
    P: Prompter,
    Q: ProgressReporter,
{
    state.advance(BuildState::HostCloning);
    let protocol =
        github::preferred_protocol(req.protocol, ports.prompter, ports.cloner, ports.reporter)
            .await?;
    let report = packages::clone_all(
        profile,
        req.layout,
        protocol,
        ports.cloner,
        ports.fs,
        ports.reporter,
    )
    .await?;
    if !report.failed.is_empty() {
        ports.reporter.warn(&format!(
            "{} package(s) could not be cloned: {}",
            report.failed.len(),
            report.failed.join(", ")
        ));
    }

    state.advance(BuildState::ContainerHandoff);
    let workdir = ports
        .fs
        .canonicalize(req.root)
        .map_err(|e| ResolutionError::RepositoryRoot {
            path: req.root.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
    let compose_file = req.project.compose_file();
    let service = primary_service(&ports.fs.read_to_string(&compose_file)?)
        .with_context(|| format!("reading {}", compose_file.display()))?
        .ok_or_else(|| ResolutionError::NoComposeService(compose_file.clone()))?;

    ports.reporter.step(&format!("Starting {}", req.project.name));
    let up = launch(req.project, req.env, ports.engine).await?;
    if !up.success() {
        return Ok(up);
    }

    state.advance(BuildState::ContainerBuilding);
    ports.reporter.step("Building packages inside the container");
    ports
        .engine
        .exec(req.project, &service, &workdir, req.container_command, req.env)
        .await
        .context("running the package build inside the container")
}

/// Start the tag's compose project detached.
///
/// # Errors
///
/// Returns an error if the compose command cannot be spawned.
pub async fn launch(
    project: &ComposeProject,
    env: &EnvironmentMap,
    engine: &impl ContainerEngine,
) -> Result<ExitStatus> {
    engine
        .up(project, env)
        .await
        .with_context(|| format!("starting {}", project.name))
}
