//! Infrastructure implementation of the `Prompter` port via `dialoguer`.

use anyhow::{Context, Result};

use crate::application::ports::Prompter;

/// Terminal prompter.
///
/// When `non_interactive` is `true` (CI, `--yes` flag, or `ROSDOCK_YES` env),
/// returns the default immediately without prompting. Interactively the
/// default is never applied: pressing Enter answers with an empty string.
pub struct DialoguerPrompter {
    non_interactive: bool,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&self, prompt: &str, default: &str) -> Result<String> {
        if self.non_interactive {
            tracing::debug!(prompt, default, "non-interactive, using default");
            return Ok(default.to_string());
        }
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("reading answer from terminal")
    }
}
