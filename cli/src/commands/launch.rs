//! `rosdock launch`: start a tag's container in the background.

use std::collections::BTreeSet;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::HostIdentity;
use crate::application::services::build::launch;
use crate::domain::environment::DISPLAY;
use crate::domain::tag::find_tag;
use crate::domain::{BuildConfig, ComposeProject, Tag, exit_code};
use crate::infra::compose::DockerCompose;
use crate::infra::host::OsHostIdentity;
use crate::output::TerminalReporter;

/// Arguments for the launch command.
#[derive(Args)]
pub struct LaunchArgs {
    /// Image tag
    pub tag: String,
}

/// Run the launch command.
///
/// # Errors
///
/// Returns an error if the tag is unknown, the environment cannot be
/// resolved, or `docker compose` cannot run.
pub async fn run(app: &AppContext, args: &LaunchArgs, tags: &BTreeSet<Tag>) -> Result<ExitCode> {
    let config = BuildConfig::new(find_tag(tags, &args.tag)?);
    let reporter = TerminalReporter::new(&app.output);
    let engine = DockerCompose::default_runner();
    let env = super::environment_for(app, &config, &engine, &reporter).await?;

    let user = OsHostIdentity.identity().user;
    let project = ComposeProject::for_tag(&app.root, &user, &config.tag);
    let status = launch(&project, &env, &engine).await?;
    if status.success() {
        app.output.success(&format!("Started {}", project.name));
        app.output.kv("compose", &project.directory.display().to_string());
        app.output.kv("display", env.get(DISPLAY).unwrap_or("-"));
    }
    Ok(ExitCode::from(exit_code(status.code())))
}
