//! Infrastructure implementation of the `DisplayProber` port via `glxinfo`.

use crate::application::ports::{CommandRunner, CommandSpec, DisplayProber};
use crate::domain::display::{PROBE_TIMEOUT, PROBE_TOOL};
use crate::infra::command_runner::TokioCommandRunner;

pub struct GlxinfoProber<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GlxinfoProber<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl GlxinfoProber<TokioCommandRunner> {
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> DisplayProber for GlxinfoProber<R> {
    fn is_available(&self) -> bool {
        on_path(PROBE_TOOL)
    }

    async fn probe(&self, display: &str) -> bool {
        let cmd = CommandSpec::new(PROBE_TOOL).args(["-display", display]);
        match self.runner.output_with_timeout(&cmd, PROBE_TIMEOUT).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                let display_name = display;
                tracing::debug!(display = display_name, error = %e, "display probe failed");
                false
            }
        }
    }
}

fn on_path(tool: &str) -> bool {
    which::which(tool).is_ok()
}
