//! Per-invocation build settings and compose project identity.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::tag::{TAGS_DIR, Tag};

/// Settings for one `build` or `launch` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub tag: Tag,
    pub with_initial_setup: bool,
    pub requires_display: bool,
}

impl BuildConfig {
    /// A launch-style config: display required, no package setup.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            with_initial_setup: false,
            requires_display: true,
        }
    }

    #[must_use]
    pub fn with_initial_setup(mut self, enabled: bool) -> Self {
        self.with_initial_setup = enabled;
        self
    }

    /// Copy of this config for steps that never open a window (image build,
    /// container handoff).
    #[must_use]
    pub fn headless(&self) -> Self {
        Self {
            requires_display: false,
            ..self.clone()
        }
    }
}

/// Where a `build` invocation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    ImageBuilding,
    HostCloning,
    ContainerHandoff,
    ContainerBuilding,
    Done,
    Failed,
}

impl BuildState {
    /// Whether `next` may follow `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        use BuildState::{
            ContainerBuilding, ContainerHandoff, Done, Failed, HostCloning, Idle, ImageBuilding,
        };
        matches!(
            (self, next),
            (Idle, ImageBuilding)
                | (ImageBuilding, HostCloning | Done | Failed)
                | (HostCloning, ContainerHandoff | Failed)
                | (ContainerHandoff, ContainerBuilding | Failed)
                | (ContainerBuilding, Done | Failed)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ImageBuilding => "image-building",
            Self::HostCloning => "host-cloning",
            Self::ContainerHandoff => "container-handoff",
            Self::ContainerBuilding => "container-building",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Directory holding the tag's `Dockerfile`, `Makefile` and `compose.yaml`.
#[must_use]
pub fn tag_dir(root: &Path, tag: &Tag) -> PathBuf {
    root.join(TAGS_DIR).join(tag.as_str())
}

/// Makefile path relative to the repository root, as passed to `make -f`.
#[must_use]
pub fn makefile_arg(tag: &Tag) -> String {
    format!("{TAGS_DIR}/{tag}/Makefile")
}

/// Compose project name. Includes the user so several people can share a host.
#[must_use]
pub fn project_name(user: &str, tag: &Tag) -> String {
    format!("{user}-{TAGS_DIR}-{tag}")
}

/// A compose project: where its files live and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub directory: PathBuf,
    pub name: String,
}

impl ComposeProject {
    #[must_use]
    pub fn for_tag(root: &Path, user: &str, tag: &Tag) -> Self {
        Self {
            directory: tag_dir(root, tag),
            name: project_name(user, tag),
        }
    }

    #[must_use]
    pub fn compose_file(&self) -> PathBuf {
        self.directory.join("compose.yaml")
    }
}

/// Map a child's exit code onto a process exit code. Signals become `1`.
#[must_use]
pub fn exit_code(code: Option<i32>) -> u8 {
    match code {
        Some(0) => 0,
        Some(c) => u8::try_from(c & 0xff).unwrap_or(1).max(1),
        None => 1,
    }
}
