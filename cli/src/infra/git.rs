//! Infrastructure implementation of the `RepoCloner` port via `git` and `ssh`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, CommandSpec, RepoCloner, SshAuthReport};
use crate::domain::CloneError;
use crate::domain::git::{GitHubProtocol, SSH_AUTH_TARGET, convert_url_protocol};
use crate::infra::command_runner::TokioCommandRunner;

/// Clones with the `git` CLI. Output streams to the terminal so credential
/// prompts and progress remain visible.
pub struct GitCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl GitCli<TokioCommandRunner> {
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> RepoCloner for GitCli<R> {
    async fn clone_repo(&self, url: &str, dest: &Path, protocol: GitHubProtocol) -> Result<()> {
        let remote = convert_url_protocol(url, protocol)?;
        tracing::info!(%remote, dest = %dest.display(), "cloning");
        let cmd = CommandSpec::new("git")
            .arg("clone")
            .arg(remote.as_str())
            .arg(dest.to_string_lossy());
        let status = self
            .runner
            .status(&cmd)
            .await
            .with_context(|| format!("running {}", cmd.display()))?;
        if !status.success() {
            return Err(CloneError::CloneFailed {
                url: remote,
                code: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }

    async fn update_submodules(&self, repo_dir: &Path) -> Result<()> {
        let cmd = CommandSpec::new("git")
            .args(["submodule", "update", "--init", "--recursive"])
            .cwd(repo_dir);
        let status = self
            .runner
            .status(&cmd)
            .await
            .with_context(|| format!("running {}", cmd.display()))?;
        if !status.success() {
            return Err(CloneError::SubmoduleFailed {
                dir: repo_dir.to_path_buf(),
                code: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }

    async fn ssh_auth_probe(&self) -> Result<SshAuthReport> {
        let cmd = CommandSpec::new("ssh").args(["-T", SSH_AUTH_TARGET]);
        let started = Instant::now();
        let output = self
            .runner
            .output(&cmd)
            .await
            .context("running ssh -T git@github.com")?;
        Ok(SshAuthReport {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        })
    }
}
