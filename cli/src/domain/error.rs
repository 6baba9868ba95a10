//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Resolution errors ─────────────────────────────────────────────────────────

/// Errors raised while assembling the child-process environment.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Could not query the container engine: {0}\n\nIs Docker installed and running? See https://docs.docker.com/engine/install/")]
    RuntimeQuery(String),

    #[error("Could not parse container engine info: {0}")]
    RuntimeParse(String),

    #[error("Command not found: glxinfo\n\nInstall it with 'sudo apt install mesa-utils'")]
    ProbeToolMissing,

    #[error("No X display device detected.")]
    NoDisplay,

    #[error("Cannot resolve repository root {path}: {reason}")]
    RepositoryRoot { path: PathBuf, reason: String },

    #[error("No service declared in {0}")]
    NoComposeService(PathBuf),
}

// ── Clone errors ──────────────────────────────────────────────────────────────

/// Per-repository clone and submodule failures. Never fatal on their own.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Not a GitHub URL: {0}")]
    UnsupportedUrl(String),

    #[error("git clone {url} failed (exit code {code})")]
    CloneFailed { url: String, code: i32 },

    #[error("git submodule update in {dir} failed (exit code {code})")]
    SubmoduleFailed { dir: PathBuf, code: i32 },
}

// ── Build failures ────────────────────────────────────────────────────────────

/// An external build command exited non-zero.
#[derive(Debug, Error)]
#[error(
    "Build failed: {step}\n\nFull build log: {}\nPlease include the full build log if you create a GitHub issue.\nhttps://github.com/ut-amrl/ros-noetic-docker/issues",
    .log.display()
)]
pub struct BuildFailure {
    /// Human-readable step name, e.g. `"catkin packages"`.
    pub step: String,
    /// Where the captured output was written.
    pub log: PathBuf,
}

// ── Auth errors ───────────────────────────────────────────────────────────────

/// SSH authentication against GitHub failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "Unable to authenticate with GitHub with SSH.\n\
         Please follow: https://docs.github.com/en/authentication/connecting-to-github-with-ssh\n\
         Or forward an agent: https://docs.github.com/en/developers/overview/using-ssh-agent-forwarding"
    )]
    SshRejected,
}

// ── Tag errors ────────────────────────────────────────────────────────────────

/// Errors related to tag lookup outside argument parsing.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Unknown tag '{tag}'. Valid tags: {valid}")]
    Unknown { tag: String, valid: String },

    #[error("No build spec for {0}")]
    NoProfile(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
