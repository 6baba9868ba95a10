//! `rosdock env`: print the environment every docker command receives.

use std::collections::BTreeSet;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::environment::IMAGE_TAG;
use crate::domain::tag::find_tag;
use crate::domain::{BuildConfig, Tag};
use crate::infra::compose::DockerCompose;
use crate::output::TerminalReporter;

/// Arguments for the env command.
#[derive(Args)]
pub struct EnvArgs {
    /// Image tag; sets IMAGE_TAG when given
    pub tag: Option<String>,

    /// Skip the X display probe
    #[arg(long)]
    pub no_display: bool,
}

/// Run the env command. Prints `KEY=value` lines in key order.
///
/// # Errors
///
/// Returns an error if the tag is unknown or the environment cannot be
/// resolved.
pub async fn run(app: &AppContext, args: &EnvArgs, tags: &BTreeSet<Tag>) -> Result<ExitCode> {
    let tag = args
        .tag
        .as_deref()
        .map(|name| find_tag(tags, name))
        .transpose()?;
    let mut config = BuildConfig::new(tag.clone().unwrap_or_else(|| Tag::new("")));
    config.requires_display = !args.no_display;

    let reporter = TerminalReporter::new(&app.output);
    let engine = DockerCompose::default_runner();
    let env = super::environment_for(app, &config, &engine, &reporter).await?;

    let untagged = format!("{IMAGE_TAG}=");
    for line in env.to_lines() {
        if tag.is_some() || !line.starts_with(&untagged) {
            println!("{line}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
