//! GitHub transport selection and URL rewriting.

use std::fmt;
use std::time::Duration;

use anyhow::Result;

use crate::domain::error::CloneError;

/// Marker every supported repository URL contains.
pub const GITHUB_HOST: &str = "github.com";

/// SSH target used to check authentication.
pub const SSH_AUTH_TARGET: &str = "git@github.com";

/// Substring GitHub prints to stderr after a successful `ssh -T`.
pub const SSH_SUCCESS_MARKER: &str = "success";

/// An `ssh -T` slower than this probably waited for a key passphrase.
pub const PASSPHRASE_THRESHOLD: Duration = Duration::from_millis(1500);

/// How repositories are fetched from GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubProtocol {
    Ssh,
    Https,
}

impl fmt::Display for GitHubProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ssh => f.write_str("ssh"),
            Self::Https => f.write_str("https"),
        }
    }
}

pub const PROTOCOL_MENU: &str = "\
How would you like to clone repositories from GitHub?

    (1) SSH             [public + private]      [pull + push]
    (2) HTTPS           [public only]           [pull only]";

pub const PROTOCOL_PROMPT: &str = "[1 or 2]";

/// Default answer in non-interactive mode.
pub const PROTOCOL_DEFAULT: &str = "2";

/// Interpret the menu answer. `None` means unrecognized.
#[must_use]
pub fn parse_protocol_choice(answer: &str) -> Option<GitHubProtocol> {
    match answer.trim() {
        "1" => Some(GitHubProtocol::Ssh),
        "2" => Some(GitHubProtocol::Https),
        _ => None,
    }
}

/// Rewrite a GitHub URL for `protocol`, preserving the repository path.
///
/// # Errors
///
/// Returns [`CloneError::UnsupportedUrl`] if the URL does not contain
/// `github.com` followed by a separator.
pub fn convert_url_protocol(url: &str, protocol: GitHubProtocol) -> Result<String, CloneError> {
    let path = url
        .find(GITHUB_HOST)
        .map(|i| &url[i + GITHUB_HOST.len()..])
        .and_then(|rest| {
            let mut chars = rest.chars();
            chars.next().map(|_| chars.as_str())
        })
        .filter(|path| !path.is_empty())
        .ok_or_else(|| CloneError::UnsupportedUrl(url.to_string()))?;

    Ok(match protocol {
        GitHubProtocol::Https => format!("https://{GITHUB_HOST}/{path}"),
        GitHubProtocol::Ssh => format!("git@{GITHUB_HOST}:{path}"),
    })
}

/// Directory name a clone of `url` lands in: last path segment without `.git`.
#[must_use]
pub fn repo_name(url: &str) -> &str {
    let last = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last)
}

/// Whether `ssh -T` stderr reports a successful login.
#[must_use]
pub fn ssh_auth_succeeded(stderr: &str) -> bool {
    stderr.contains(SSH_SUCCESS_MARKER)
}

/// Heuristic: a slow auth check means the user typed a passphrase.
#[must_use]
pub fn passphrase_likely(elapsed: Duration) -> bool {
    elapsed > PASSPHRASE_THRESHOLD
}
