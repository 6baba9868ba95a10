//! Infrastructure implementation of the `ContainerEngine` port.
//!
//! `DockerCompose<R>` routes all `docker` and `docker compose` calls through
//! a `CommandRunner`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{CommandRunner, CommandSpec, ContainerEngine};
use crate::domain::{ComposeProject, EnvironmentMap};
use crate::infra::command_runner::TokioCommandRunner;

/// Docker adapter. Generic over `R: CommandRunner` so tests can inject a
/// recording runner.
pub struct DockerCompose<R: CommandRunner> {
    runner: R,
    /// Whether stdout is a terminal; `exec` passes `-T` when it is not.
    tty: bool,
}

impl<R: CommandRunner> DockerCompose<R> {
    pub fn new(runner: R, tty: bool) -> Self {
        Self { runner, tty }
    }

    fn compose(project: &ComposeProject, env: &EnvironmentMap) -> CommandSpec {
        CommandSpec::new("docker")
            .arg("compose")
            .arg("--project-directory")
            .arg(project.directory.to_string_lossy())
            .arg("--project-name")
            .arg(project.name.as_str())
            .env(env)
    }
}

impl DockerCompose<TokioCommandRunner> {
    /// Production adapter attached to the real stdout.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner, console::Term::stdout().is_term())
    }
}

impl<R: CommandRunner> ContainerEngine for DockerCompose<R> {
    async fn info(&self) -> Result<Output> {
        let cmd = CommandSpec::new("docker").args(["info", "--format={{json .}}"]);
        self.runner.output(&cmd).await
    }

    async fn up(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus> {
        let cmd = Self::compose(project, env).args(["up", "-t", "0", "--detach"]);
        self.runner.status(&cmd).await
    }

    async fn exec(
        &self,
        project: &ComposeProject,
        service: &str,
        workdir: &Path,
        command: &[String],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus> {
        let mut cmd = Self::compose(project, env)
            .arg("exec")
            .arg("--workdir")
            .arg(workdir.to_string_lossy());
        if !self.tty {
            cmd = cmd.arg("-T");
        }
        let cmd = cmd.arg(service).args(command.iter().cloned());
        self.runner.status(&cmd).await
    }

    async fn stop(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus> {
        let cmd = Self::compose(project, env).args(["stop", "-t", "0"]);
        self.runner.status(&cmd).await
    }
}
