//! `rosdock build`: build a tag's image, optionally with initial package setup.

use std::collections::BTreeSet;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, container_entrypoint};
use crate::application::ports::HostIdentity;
use crate::application::services::build::{self as service, BuildPorts, BuildRequest};
use crate::domain::tag::find_tag;
use crate::domain::{BuildConfig, ComposeProject, Tag};
use crate::infra::catalog;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::compose::DockerCompose;
use crate::infra::fs::LocalFs;
use crate::infra::git::GitCli;
use crate::infra::host::OsHostIdentity;
use crate::output::TerminalReporter;

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Image tag
    pub tag: String,

    /// Clone and build the tag's ROS packages after the image
    #[arg(long)]
    pub with_initial_setup: bool,
}

/// Run the build command.
///
/// # Errors
///
/// Returns an error if the tag is unknown, the environment cannot be
/// resolved, or a build step cannot run.
pub async fn run(app: &AppContext, args: &BuildArgs, tags: &BTreeSet<Tag>) -> Result<ExitCode> {
    let tag = find_tag(tags, &args.tag)?;
    let config = BuildConfig::new(tag)
        .with_initial_setup(args.with_initial_setup)
        .headless();

    let reporter = TerminalReporter::new(&app.output);
    let engine = DockerCompose::default_runner();
    let env = super::environment_for(app, &config, &engine, &reporter).await?;

    let user = OsHostIdentity.identity().user;
    let project = ComposeProject::for_tag(&app.root, &user, &config.tag);
    let layout = app.layout()?;
    let profile = catalog::profile_for(&config.tag);
    let container_command = [
        container_entrypoint(&app.root),
        "_build-packages".to_string(),
        config.tag.to_string(),
    ];

    let req = BuildRequest {
        config: &config,
        root: &app.root,
        env: &env,
        project: &project,
        layout: &layout,
        profile: profile.as_ref(),
        protocol: app.config.github.fixed_protocol(),
        container_command: &container_command,
    };
    let ports = BuildPorts {
        runner: &TokioCommandRunner,
        engine: &engine,
        cloner: &GitCli::default_runner(),
        fs: &LocalFs,
        prompter: &app.prompter(),
        reporter: &reporter,
    };

    let outcome = service::build(&req, &ports).await?;
    debug_assert!(outcome.state.is_terminal());
    tracing::debug!(state = %outcome.state, code = outcome.exit_code, "build finished");
    Ok(ExitCode::from(outcome.exit_code))
}
