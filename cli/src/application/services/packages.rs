//! Application service: dependency package cloning and building.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, CommandSpec, HookContext, LocalFs, ProgressReporter, RepoCloner, TagProfile,
};
use crate::domain::environment::{EnvironmentMap, parse_env_dump};
use crate::domain::git::repo_name;
use crate::domain::packages::SUBMODULES_FILE;
use crate::domain::{BuildFailure, GitHubProtocol, PackageLayout, PackageSpec};

/// File sourced inside the container to get the ROS environment. Its
/// presence is also how we know we are inside the container.
pub const DOCKERRC: &str = "/dockerrc";

/// What happened during `clone_all`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CloneReport {
    /// Repositories cloned by this run.
    pub cloned: Vec<String>,
    /// Repositories already present.
    pub skipped: Vec<String>,
    /// Repositories whose clone or submodule update failed.
    pub failed: Vec<String>,
}

/// Clone every package of `profile` that is not yet on disk.
///
/// Workspace packages come first, then standalone packages in declared
/// order. Standalone packages with submodules always get a submodule update,
/// even if the checkout already existed, so an interrupted earlier run is
/// repaired. Individual failures are reported and skipped.
///
/// # Errors
///
/// Returns an error only if a directory cannot be created or the
/// `post_clone` hook fails.
pub async fn clone_all(
    profile: &TagProfile,
    layout: &PackageLayout,
    protocol: GitHubProtocol,
    cloner: &impl RepoCloner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
) -> Result<CloneReport> {
    let mut report = CloneReport::default();

    for url in &profile.packages.workspace {
        let dest = layout.workspace_package(url);
        clone_missing(url, &dest, protocol, cloner, fs, reporter, &mut report).await?;
    }

    for url in &profile.packages.standalone {
        let dest = layout.standalone_package(url);
        clone_missing(url, &dest, protocol, cloner, fs, reporter, &mut report).await?;

        if fs.exists(&dest.join(SUBMODULES_FILE)) {
            reporter.step(&format!("Updating submodules for {}", repo_name(url)));
            if let Err(e) = cloner.update_submodules(&dest).await {
                reporter.warn(&format!("{e:#}"));
                report.failed.push(url.clone());
            }
        }
    }

    if let Some(hook) = profile.post_clone {
        hook(&HookContext {
            layout,
            fs,
            reporter,
        })
        .context("post-clone step")?;
    }

    Ok(report)
}

async fn clone_missing(
    url: &str,
    dest: &Path,
    protocol: GitHubProtocol,
    cloner: &impl RepoCloner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    report: &mut CloneReport,
) -> Result<()> {
    if fs.exists(dest) {
        tracing::debug!(url, dest = %dest.display(), "already cloned");
        report.skipped.push(url.to_string());
        return Ok(());
    }
    if let Some(parent) = dest.parent() {
        fs.create_dir_all(parent)?;
    }

    reporter.step(&format!("Cloning {url}"));
    match cloner.clone_repo(url, dest, protocol).await {
        Ok(()) => report.cloned.push(url.to_string()),
        Err(e) => {
            reporter.warn(&format!("{e:#}"));
            report.failed.push(url.to_string());
        }
    }
    Ok(())
}

/// Collaborators and settings for `build_all`.
pub struct BuildContext<'a, R, F, P> {
    pub runner: &'a R,
    pub fs: &'a F,
    pub reporter: &'a P,
    pub layout: &'a PackageLayout,
    /// Environment for build commands, usually from [`source_dockerrc`].
    pub env: &'a EnvironmentMap,
    /// Parallel jobs for standalone `make`.
    pub jobs: usize,
    /// Where captured output of failed steps is written.
    pub log_dir: &'a Path,
}

/// Build all packages: `rosdep update`, the catkin workspace as one unit,
/// then each standalone package in declared order.
///
/// # Errors
///
/// Returns a [`BuildFailure`] for the first step that exits non-zero; later
/// packages are not attempted.
pub async fn build_all<R, F, P>(spec: &PackageSpec, ctx: &BuildContext<'_, R, F, P>) -> Result<()>
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    if !ctx.fs.exists(&ctx.layout.rosdep_cache()) {
        let cmd = CommandSpec::new("rosdep")
            .arg("update")
            .env(ctx.env)
            .merged_output();
        run_captured(ctx, "rosdep update", "rosdep-update", &cmd).await?;
    }

    let workspace_src = ctx.layout.workspace_src();
    if ctx.fs.exists(&workspace_src) {
        let root = ctx.layout.workspace_root();
        // catkin_make ignores the dependency graph between Spot packages
        // when run in parallel.
        let cmd = CommandSpec::new("catkin_make")
            .arg("-C")
            .arg(root.to_string_lossy())
            .args(["-j", "1"])
            .cwd(&root)
            .env(ctx.env)
            .merged_output();
        run_captured(ctx, "catkin packages", "catkin", &cmd).await?;
    }

    for url in &spec.standalone {
        let name = repo_name(url);
        let dir = ctx.layout.standalone_package(url);
        let cmd = CommandSpec::new("make")
            .args(["-j".to_string(), ctx.jobs.to_string()])
            .cwd(&dir)
            .env(ctx.env)
            .merged_output();
        run_captured(ctx, name, name, &cmd).await?;
    }

    Ok(())
}

/// Run a build step with its output captured. On failure the output is
/// printed and saved to `<log_dir>/<log_name>.log`. Steps are built with
/// [`CommandSpec::merged_output`], so stdout holds both streams in order.
async fn run_captured<R, F, P>(
    ctx: &BuildContext<'_, R, F, P>,
    step: &str,
    log_name: &str,
    cmd: &CommandSpec,
) -> Result<()>
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    ctx.reporter.begin_task(&format!("Building {step}"));
    let output = match ctx.runner.output(cmd).await {
        Ok(output) => output,
        Err(e) => {
            ctx.reporter.end_task(&format!("{step} could not start"), false);
            return Err(e.context(format!("running {}", cmd.display())));
        }
    };

    if output.status.success() {
        ctx.reporter.end_task(&format!("Built {step}"), true);
        return Ok(());
    }
    ctx.reporter.end_task(&format!("{step} failed"), false);

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    ctx.reporter.dump(&text);

    let log = ctx.log_dir.join(format!("{log_name}.log"));
    ctx.fs.create_dir_all(ctx.log_dir)?;
    ctx.fs.write(&log, &text)?;

    Err(BuildFailure {
        step: step.to_string(),
        log,
    }
    .into())
}

/// Environment after sourcing [`DOCKERRC`] in a login-less bash.
///
/// # Errors
///
/// Returns an error if bash cannot run or sourcing fails.
pub async fn source_dockerrc(runner: &impl CommandRunner) -> Result<EnvironmentMap> {
    let cmd = CommandSpec::new("bash").args(["-c".to_string(), format!("source {DOCKERRC} && env")]);
    let output = runner.output(&cmd).await.context("sourcing /dockerrc")?;
    anyhow::ensure!(
        output.status.success(),
        "sourcing {DOCKERRC} failed: {}",
        String::from_utf8_lossy(&output.stderr).trim()
    );
    Ok(parse_env_dump(&String::from_utf8_lossy(&output.stdout)))
}
