//! Application service: GitHub protocol choice and SSH pre-flight.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Prompter, RepoCloner};
use crate::domain::AuthError;
use crate::domain::git::{
    GitHubProtocol, PROTOCOL_DEFAULT, PROTOCOL_MENU, PROTOCOL_PROMPT, parse_protocol_choice,
    passphrase_likely, ssh_auth_succeeded,
};

/// Pick the clone protocol for this session.
///
/// `fixed` comes from configuration and skips the prompt. Unrecognized
/// answers fall back to HTTPS. Choosing SSH runs [`check_ssh_auth`].
///
/// # Errors
///
/// Returns an error if the prompt fails or SSH authentication fails.
pub async fn preferred_protocol(
    fixed: Option<GitHubProtocol>,
    prompter: &impl Prompter,
    cloner: &impl RepoCloner,
    reporter: &impl ProgressReporter,
) -> Result<GitHubProtocol> {
    let protocol = if let Some(protocol) = fixed {
        protocol
    } else {
        reporter.alert(PROTOCOL_MENU);
        let answer = prompter.ask(PROTOCOL_PROMPT, PROTOCOL_DEFAULT)?;
        parse_protocol_choice(&answer).unwrap_or_else(|| {
            reporter.warn(&format!(
                "Unrecognized input '{}'. Falling back to HTTPS.",
                answer.trim()
            ));
            GitHubProtocol::Https
        })
    };

    if protocol == GitHubProtocol::Ssh {
        check_ssh_auth(cloner, reporter).await?;
    }
    Ok(protocol)
}

/// Verify GitHub accepts our SSH key before any clone is attempted.
///
/// # Errors
///
/// Returns [`AuthError::SshRejected`] if GitHub did not report success.
/// There is no fallback to HTTPS.
pub async fn check_ssh_auth(
    cloner: &impl RepoCloner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("Checking GitHub SSH authentication...");
    let report = cloner.ssh_auth_probe().await?;

    if !ssh_auth_succeeded(&report.stderr) {
        reporter.dump(&report.stderr);
        return Err(AuthError::SshRejected.into());
    }

    reporter.success("Authenticated with GitHub.");
    if passphrase_likely(report.elapsed) {
        reporter.warn(
            "You may be prompted to enter your SSH key password several times.\n    \
             Recommended: https://docs.github.com/en/developers/overview/using-ssh-agent-forwarding",
        );
    }
    Ok(())
}
