//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution, with kill-on-timeout where a timeout applies.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::{CommandRunner, CommandSpec};

/// Re-executes `$0 "$@"` with stderr pointed at the stdout pipe.
const MERGE_STDERR: &str = r#"exec "$0" "$@" 2>&1"#;

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` drops the future but does
/// not reliably kill the child, so timeouts use `tokio::select!` with an
/// explicit `child.kill()`.
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    fn command(spec: &CommandSpec) -> tokio::process::Command {
        tracing::debug!(command = %spec.display(), cwd = ?spec.cwd, "spawning");
        let mut cmd = if spec.merge_stderr {
            let mut sh = tokio::process::Command::new("sh");
            sh.args(["-c", MERGE_STDERR, spec.program.as_str()]).args(&spec.args);
            sh
        } else {
            let mut cmd = tokio::process::Command::new(&spec.program);
            cmd.args(&spec.args);
            cmd
        };
        cmd.envs(spec.env.iter())
            .kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    async fn capture(spec: &CommandSpec, timeout: Option<Duration>) -> Result<Output> {
        let program = spec.program.as_str();
        let mut child = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let collect = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stdout_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stderr_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
            );
            Ok::<_, anyhow::Error>(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        };

        let Some(timeout) = timeout else {
            return collect.await;
        };

        let result = tokio::select! {
            result = collect => Some(result),
            () = tokio::time::sleep(timeout) => None,
        };
        match result {
            Some(result) => result,
            None => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}ms", timeout.as_millis())
            }
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn output(&self, cmd: &CommandSpec) -> Result<Output> {
        Self::capture(cmd, None).await
    }

    async fn output_with_timeout(&self, cmd: &CommandSpec, timeout: Duration) -> Result<Output> {
        Self::capture(cmd, Some(timeout)).await
    }

    async fn status(&self, cmd: &CommandSpec) -> Result<ExitStatus> {
        let program = cmd.program.as_str();
        let mut child = Self::command(cmd)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
