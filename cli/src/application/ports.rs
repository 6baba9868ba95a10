//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::RosdockConfig;
use crate::domain::environment::{EnvironmentMap, HostIdentityValues};
use crate::domain::{ComposeProject, GitHubProtocol, PackageLayout, PackageSpec, Tag};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A child process to run: program, arguments, extra environment, working
/// directory. The environment is layered over the inherited one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: EnvironmentMap,
    pub cwd: Option<PathBuf>,
    /// Send stderr into the stdout pipe so captured output keeps its order.
    pub merge_stderr: bool,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: EnvironmentMap::new(),
            cwd: None,
            merge_stderr: false,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, env: &EnvironmentMap) -> Self {
        self.env = env.clone();
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn merged_output(mut self) -> Self {
        self.merge_stderr = true;
        self
    }

    /// `program arg1 arg2 …`, for logs and messages.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What `ssh -T` printed and how long it took.
#[derive(Debug, Clone)]
pub struct SshAuthReport {
    pub stderr: String,
    pub elapsed: Duration,
}

/// Extra host-side step run after cloning or after a successful build.
pub type HookFn = fn(&HookContext<'_>) -> Result<()>;

/// What a hook may touch.
pub struct HookContext<'a> {
    pub layout: &'a PackageLayout,
    pub fs: &'a dyn LocalFs,
    pub reporter: &'a dyn ProgressReporter,
}

/// Everything a tag needs for initial setup: its packages and optional hooks.
#[derive(Clone)]
pub struct TagProfile {
    pub packages: PackageSpec,
    pub post_clone: Option<HookFn>,
    pub post_build: Option<HookFn>,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its stdout and stderr.
    async fn output(&self, cmd: &CommandSpec) -> Result<Output>;
    /// Run a program and capture its output, killing it after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn output_with_timeout(&self, cmd: &CommandSpec, timeout: Duration) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn status(&self, cmd: &CommandSpec) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a warning that explains an upcoming prompt. Never suppressed.
    fn alert(&self, message: &str);
    /// Print raw tool output verbatim (never suppressed).
    fn dump(&self, output: &str);
    /// Start a long-running task (a spinner on a terminal).
    fn begin_task(&self, message: &str);
    /// Finish the task started with `begin_task`.
    fn end_task(&self, message: &str, ok: bool);
}

// ── Interaction Port ──────────────────────────────────────────────────────────

/// Asks the user a question. Non-interactive implementations return `default`.
pub trait Prompter {
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn ask(&self, prompt: &str, default: &str) -> Result<String>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// Reads user name, UID and hostname from the operating system.
pub trait HostIdentity {
    fn identity(&self) -> HostIdentityValues;
}

/// Probes X display devices.
#[allow(async_fn_in_trait)]
pub trait DisplayProber {
    /// Whether the probing tool is installed.
    fn is_available(&self) -> bool;
    /// Whether `display` (e.g. `":0"`) can be opened within the probe timeout.
    async fn probe(&self, display: &str) -> bool;
}

/// Discovers build-target tags.
pub trait TagRegistry {
    /// Scan for valid tags. Never fails; a missing directory yields no tags.
    fn list_tags(&self) -> BTreeSet<Tag>;

    fn is_valid(&self, tag: &str) -> bool {
        self.list_tags().iter().any(|t| t.as_str() == tag)
    }
}

// ── Container Port ────────────────────────────────────────────────────────────

/// Container engine and compose operations.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine {
    /// Engine info as JSON (`docker info --format={{json .}}`).
    async fn info(&self) -> Result<Output>;
    /// Start the project detached.
    async fn up(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus>;
    /// Run `command` in `service` with an inherited TTY and the given workdir.
    async fn exec(
        &self,
        project: &ComposeProject,
        service: &str,
        workdir: &Path,
        command: &[String],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus>;
    /// Stop the project with no grace period.
    async fn stop(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus>;
}

// ── Git Port ──────────────────────────────────────────────────────────────────

/// Clones repositories and checks GitHub SSH access.
#[allow(async_fn_in_trait)]
pub trait RepoCloner {
    /// Clone `url` into `dest` using `protocol`. Does not check whether
    /// `dest` already exists.
    async fn clone_repo(&self, url: &str, dest: &Path, protocol: GitHubProtocol) -> Result<()>;
    /// Recursively initialize and update submodules, one at a time.
    async fn update_submodules(&self, repo_dir: &Path) -> Result<()>;
    /// Run the SSH authentication probe against GitHub.
    async fn ssh_auth_probe(&self) -> Result<SshAuthReport>;
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    fn load(&self) -> Result<RosdockConfig>;
    /// Persist the configuration.
    fn save(&self, config: &RosdockConfig) -> Result<()>;
    /// Where the configuration lives.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts local filesystem access.
pub trait LocalFs {
    /// Whether `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;
    /// Whether `path` exists as a directory entry, even a dangling symlink.
    fn entry_exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn symlink(&self, source: &Path, link: &Path) -> Result<()>;
    /// Absolute, symlink-free form of `path`.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}
