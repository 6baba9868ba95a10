//! `rosdock _build-packages`: in-container package build entrypoint.

use std::num::NonZeroUsize;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::LocalFs as _;
use crate::application::services::packages::{BuildContext, DOCKERRC, build_all, source_dockerrc};
use crate::domain::{Tag, TagError};
use crate::infra::catalog;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::output::TerminalReporter;

/// Arguments for the in-container build.
#[derive(Args)]
pub struct BuildPackagesArgs {
    /// Image tag whose packages are built
    pub tag: String,
}

/// Build every package of the tag's profile inside the container.
///
/// # Errors
///
/// Returns an error when run outside the container, when the tag has no
/// profile, or when a build step fails.
pub async fn run(app: &AppContext, args: &BuildPackagesArgs) -> Result<ExitCode> {
    anyhow::ensure!(
        LocalFs.exists(Path::new(DOCKERRC)),
        "_build-packages must run inside the container ({DOCKERRC} not found)"
    );

    let tag = Tag::new(args.tag.as_str());
    let profile =
        catalog::profile_for(&tag).ok_or_else(|| TagError::NoProfile(tag.to_string()))?;

    let runner = TokioCommandRunner;
    let env = source_dockerrc(&runner).await?;
    let reporter = TerminalReporter::new(&app.output);
    let layout = app.layout()?;
    let log_dir = app.log_dir()?;
    let jobs = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    tracing::debug!(%tag, jobs, "building packages");

    let ctx = BuildContext {
        runner: &runner,
        fs: &LocalFs,
        reporter: &reporter,
        layout: &layout,
        env: &env,
        jobs,
        log_dir: &log_dir,
    };
    build_all(&profile.packages, &ctx).await?;
    Ok(ExitCode::SUCCESS)
}
