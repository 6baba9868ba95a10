//! CLI argument parsing with clap derive.
//!
//! Tag arguments are restricted at runtime to the tags found on disk, so
//! `--help` and usage errors list them.

use std::collections::BTreeSet;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Arg, CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::{RosdockConfig, Tag};

/// Build and launch ROS Noetic development containers
#[derive(Parser)]
#[command(
    name = "rosdock",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer prompts with their defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the image for a tag
    Build(commands::build::BuildArgs),

    /// Start the container for a tag
    Launch(commands::launch::LaunchArgs),

    /// Print the environment passed to docker
    Env(commands::env::EnvArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    #[command(hide = true, name = "_build-packages")]
    BuildPackages(commands::build_packages::BuildPackagesArgs),
}

/// Subcommands whose `tag` argument must name a discovered tag.
const TAGGED_SUBCOMMANDS: [&str; 3] = ["build", "launch", "env"];

impl Cli {
    /// The clap command with `tag` arguments limited to `tags`.
    #[must_use]
    pub fn command_with_tags(tags: &BTreeSet<Tag>) -> clap::Command {
        let names: Vec<String> = tags.iter().map(ToString::to_string).collect();
        TAGGED_SUBCOMMANDS
            .into_iter()
            .fold(Self::command(), |cmd, name| {
                let names = names.clone();
                cmd.mut_subcommand(name, move |sub| {
                    sub.mut_arg("tag", move |arg: Arg| {
                        arg.value_parser(PossibleValuesParser::new(names))
                    })
                })
            })
    }

    /// Parse `std::env::args`, exiting with usage on error.
    #[must_use]
    pub fn parse_with_tags(tags: &BTreeSet<Tag>) -> Self {
        let matches = Self::command_with_tags(tags).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(
        self,
        config: RosdockConfig,
        root: std::path::PathBuf,
        tags: &BTreeSet<Tag>,
    ) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        };
        let app = AppContext::new(&flags, config, root);

        match command {
            Command::Build(args) => commands::build::run(&app, &args, tags).await,
            Command::Launch(args) => commands::launch::run(&app, &args, tags).await,
            Command::Env(args) => commands::env::run(&app, &args, tags).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::BuildPackages(args) => commands::build_packages::run(&app, &args).await,
        }
    }
}
