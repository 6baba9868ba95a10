//! Shared test helpers: recording port implementations and output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use rosdock_cli::application::ports::{
    CommandRunner, CommandSpec, ContainerEngine, DisplayProber, HostIdentity, LocalFs,
    ProgressReporter, Prompter, RepoCloner, SshAuthReport,
};
use rosdock_cli::domain::environment::HostIdentityValues;
use rosdock_cli::domain::{ComposeProject, EnvironmentMap, GitHubProtocol};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub const RUNC_INFO: &[u8] = br#"{"Runtimes":{"runc":{}},"DefaultRuntime":"runc"}"#;

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Records every event as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn push(&self, kind: &str, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("{kind}: {message}"));
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn has(&self, kind: &str, needle: &str) -> bool {
        let prefix = format!("{kind}: ");
        self.events()
            .iter()
            .any(|e| e.starts_with(&prefix) && e.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn alert(&self, message: &str) {
        self.push("alert", message);
    }
    fn dump(&self, output: &str) {
        self.push("dump", output);
    }
    fn begin_task(&self, message: &str) {
        self.push("begin", message);
    }
    fn end_task(&self, message: &str, ok: bool) {
        self.push(if ok { "end-ok" } else { "end-fail" }, message);
    }
}

// ── Prompter ─────────────────────────────────────────────────────────────────

/// Answers from a queue; falls back to the prompt's default when empty.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(ToString::to_string).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().expect("lock").len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &str, default: &str) -> Result<String> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        Ok(self
            .answers
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }
}

// ── Filesystem ───────────────────────────────────────────────────────────────

/// In-memory filesystem. Directories and files are tracked as plain paths.
#[derive(Default)]
pub struct MemFs {
    paths: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, String>>,
    links: Mutex<BTreeMap<PathBuf, PathBuf>>,
}

impl MemFs {
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let fs = Self::default();
        fs.paths
            .lock()
            .expect("lock")
            .extend(paths.into_iter().map(Into::into));
        fs
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .expect("lock")
            .insert(path.into(), content.to_string());
        self
    }

    /// Add a dangling symlink at `link`.
    #[must_use]
    pub fn with_dangling_link(self, link: impl Into<PathBuf>) -> Self {
        self.links
            .lock()
            .expect("lock")
            .insert(link.into(), PathBuf::from("/nowhere"));
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().expect("lock").get(path.as_ref()).cloned()
    }

    pub fn link_target(&self, link: impl AsRef<Path>) -> Option<PathBuf> {
        self.links.lock().expect("lock").get(link.as_ref()).cloned()
    }
}

impl LocalFs for MemFs {
    fn exists(&self, path: &Path) -> bool {
        if self.paths.lock().expect("lock").contains(path)
            || self.files.lock().expect("lock").contains_key(path)
        {
            return true;
        }
        let target = self.links.lock().expect("lock").get(path).cloned();
        target.is_some_and(|t| self.exists(&t))
    }

    fn entry_exists(&self, path: &Path) -> bool {
        self.exists(path) || self.links.lock().expect("lock").contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.paths.lock().expect("lock").insert(path.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().expect("lock").remove(path);
        self.links.lock().expect("lock").remove(path);
        self.paths.lock().expect("lock").remove(path);
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path)
            .ok_or_else(|| anyhow::anyhow!("reading file {}: not found", path.display()))
    }

    fn symlink(&self, source: &Path, link: &Path) -> Result<()> {
        anyhow::ensure!(!self.entry_exists(link), "{} exists", link.display());
        self.links
            .lock()
            .expect("lock")
            .insert(link.to_path_buf(), source.to_path_buf());
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

// ── Command runner ───────────────────────────────────────────────────────────

/// `program args… @ cwd`, the form commands are recorded and matched in.
pub fn command_key(cmd: &CommandSpec) -> String {
    match &cmd.cwd {
        Some(dir) => format!("{} @ {}", cmd.display(), dir.display()),
        None => cmd.display(),
    }
}

/// Records every command. Commands whose [`command_key`] contains a
/// registered needle fail with the registered code; the failure message
/// lands on stdout when the command merges its streams.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<CommandSpec>>,
    failures: Vec<(String, i32)>,
    replies: Vec<(String, Vec<u8>)>,
}

impl RecordingRunner {
    #[must_use]
    pub fn failing(mut self, needle: &str, code: i32) -> Self {
        self.failures.push((needle.to_string(), code));
        self
    }

    #[must_use]
    pub fn replying(mut self, needle: &str, stdout: &[u8]) -> Self {
        self.replies.push((needle.to_string(), stdout.to_vec()));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(command_key)
            .collect()
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, cmd: &CommandSpec) -> i32 {
        self.calls.lock().expect("lock").push(cmd.clone());
        let display = command_key(cmd);
        self.failures
            .iter()
            .find(|(needle, _)| display.contains(needle.as_str()))
            .map_or(0, |(_, code)| *code)
    }

    fn reply(&self, cmd: &CommandSpec) -> Vec<u8> {
        let display = command_key(cmd);
        self.replies
            .iter()
            .find(|(needle, _)| display.contains(needle.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    async fn output(&self, cmd: &CommandSpec) -> Result<Output> {
        let code = self.record(cmd);
        if code == 0 {
            return Ok(ok_output(&self.reply(cmd)));
        }
        let message = format!("{} failed\n", cmd.program);
        if cmd.merge_stderr {
            Ok(Output {
                stdout: message.into_bytes(),
                ..err_output(code, b"")
            })
        } else {
            Ok(err_output(code, message.as_bytes()))
        }
    }

    async fn output_with_timeout(&self, cmd: &CommandSpec, _: Duration) -> Result<Output> {
        self.output(cmd).await
    }

    async fn status(&self, cmd: &CommandSpec) -> Result<ExitStatus> {
        Ok(exit_status(self.record(cmd)))
    }
}

// ── Container engine ─────────────────────────────────────────────────────────

/// Records calls as `"info"`, `"up <project>"`, `"exec <service> <workdir> <cmd…>"`
/// and `"stop <project>"`.
pub struct RecordingEngine {
    pub calls: Mutex<Vec<String>>,
    pub envs: Mutex<Vec<EnvironmentMap>>,
    info: Output,
    up_code: i32,
    exec_code: i32,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            envs: Mutex::new(Vec::new()),
            info: ok_output(RUNC_INFO),
            up_code: 0,
            exec_code: 0,
        }
    }
}

impl RecordingEngine {
    #[must_use]
    pub fn with_info(mut self, info: Output) -> Self {
        self.info = info;
        self
    }

    #[must_use]
    pub fn with_up_code(mut self, code: i32) -> Self {
        self.up_code = code;
        self
    }

    #[must_use]
    pub fn with_exec_code(mut self, code: i32) -> Self {
        self.exec_code = code;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String, env: Option<&EnvironmentMap>) {
        self.calls.lock().expect("lock").push(call);
        if let Some(env) = env {
            self.envs.lock().expect("lock").push(env.clone());
        }
    }
}

impl ContainerEngine for RecordingEngine {
    async fn info(&self) -> Result<Output> {
        self.record("info".to_string(), None);
        Ok(self.info.clone())
    }

    async fn up(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus> {
        self.record(format!("up {}", project.name), Some(env));
        Ok(exit_status(self.up_code))
    }

    async fn exec(
        &self,
        _: &ComposeProject,
        service: &str,
        workdir: &Path,
        command: &[String],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus> {
        self.record(
            format!("exec {service} {} {}", workdir.display(), command.join(" ")),
            Some(env),
        );
        Ok(exit_status(self.exec_code))
    }

    async fn stop(&self, project: &ComposeProject, env: &EnvironmentMap) -> Result<ExitStatus> {
        self.record(format!("stop {}", project.name), Some(env));
        Ok(exit_status(0))
    }
}

// ── Git ──────────────────────────────────────────────────────────────────────

/// Records clones as `(url, dest, protocol)` and submodule updates by path.
pub struct RecordingCloner {
    pub clones: Mutex<Vec<(String, PathBuf, GitHubProtocol)>>,
    pub submodules: Mutex<Vec<PathBuf>>,
    pub ssh_probes: Mutex<u32>,
    failing: Vec<String>,
    ssh: SshAuthReport,
}

impl Default for RecordingCloner {
    fn default() -> Self {
        Self {
            clones: Mutex::new(Vec::new()),
            submodules: Mutex::new(Vec::new()),
            ssh_probes: Mutex::new(0),
            failing: Vec::new(),
            ssh: SshAuthReport {
                stderr: "Hi alice! You've successfully authenticated, but GitHub does not provide shell access.\n".to_string(),
                elapsed: Duration::from_millis(300),
            },
        }
    }
}

impl RecordingCloner {
    #[must_use]
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    #[must_use]
    pub fn with_ssh(mut self, stderr: &str, elapsed: Duration) -> Self {
        self.ssh = SshAuthReport {
            stderr: stderr.to_string(),
            elapsed,
        };
        self
    }

    pub fn cloned_urls(&self) -> Vec<String> {
        self.clones
            .lock()
            .expect("lock")
            .iter()
            .map(|(url, _, _)| url.clone())
            .collect()
    }

    pub fn ssh_probe_count(&self) -> u32 {
        *self.ssh_probes.lock().expect("lock")
    }
}

impl RepoCloner for RecordingCloner {
    async fn clone_repo(&self, url: &str, dest: &Path, protocol: GitHubProtocol) -> Result<()> {
        self.clones
            .lock()
            .expect("lock")
            .push((url.to_string(), dest.to_path_buf(), protocol));
        if self.failing.iter().any(|f| f == url) {
            anyhow::bail!("git clone {url} failed (exit code 128)");
        }
        Ok(())
    }

    async fn update_submodules(&self, repo_dir: &Path) -> Result<()> {
        self.submodules
            .lock()
            .expect("lock")
            .push(repo_dir.to_path_buf());
        Ok(())
    }

    async fn ssh_auth_probe(&self) -> Result<SshAuthReport> {
        *self.ssh_probes.lock().expect("lock") += 1;
        Ok(self.ssh.clone())
    }
}

// ── Host and display ─────────────────────────────────────────────────────────

pub struct FixedHost;

impl HostIdentity for FixedHost {
    fn identity(&self) -> HostIdentityValues {
        HostIdentityValues {
            user: "alice".to_string(),
            uid: 1000,
            hostname: "robot-01".to_string(),
        }
    }
}

/// Succeeds only for `:<n>` when `succeed_at` is `Some(n)`; records every probe.
pub struct ScriptedProber {
    pub available: bool,
    pub succeed_at: Option<u32>,
    pub probes: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new(succeed_at: Option<u32>) -> Self {
        Self {
            available: true,
            succeed_at,
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            ..Self::new(None)
        }
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().expect("lock").clone()
    }
}

impl DisplayProber for ScriptedProber {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn probe(&self, display: &str) -> bool {
        self.probes.lock().expect("lock").push(display.to_string());
        self.succeed_at
            .is_some_and(|n| display == format!(":{n}"))
    }
}
