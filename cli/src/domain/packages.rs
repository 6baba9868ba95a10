//! Dependency package declarations and where they live on disk.

use std::path::PathBuf;

use crate::domain::git::repo_name;

/// Repositories a tag depends on.
///
/// `workspace` packages are catkin siblings built as one unit, so their order
/// does not matter. `standalone` packages are built one by one in exactly the
/// declared order; the author lists them dependencies-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSpec {
    pub workspace: Vec<String>,
    pub standalone: Vec<String>,
}

impl PackageSpec {
    #[must_use]
    pub fn new<W, S>(workspace: W, standalone: S) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            workspace: workspace.into_iter().map(Into::into).collect(),
            standalone: standalone.into_iter().map(Into::into).collect(),
        }
    }
}

/// Directory names under `$HOME` used for packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    home: PathBuf,
    workspace_dir: String,
    standalone_dir: String,
}

pub const DEFAULT_WORKSPACE_DIR: &str = "catkin_ws";
pub const DEFAULT_STANDALONE_DIR: &str = "ut-amrl";

/// Marker of an initialized rosdep cache.
pub const ROSDEP_CACHE: &str = ".ros/rosdep";

/// Present in repositories that declare submodules.
pub const SUBMODULES_FILE: &str = ".gitmodules";

impl PackageLayout {
    #[must_use]
    pub fn new(home: impl Into<PathBuf>, workspace_dir: &str, standalone_dir: &str) -> Self {
        Self {
            home: home.into(),
            workspace_dir: workspace_dir.to_string(),
            standalone_dir: standalone_dir.to_string(),
        }
    }

    #[must_use]
    pub fn with_defaults(home: impl Into<PathBuf>) -> Self {
        Self::new(home, DEFAULT_WORKSPACE_DIR, DEFAULT_STANDALONE_DIR)
    }

    /// Catkin workspace root, e.g. `~/catkin_ws`.
    #[must_use]
    pub fn workspace_root(&self) -> PathBuf {
        self.home.join(&self.workspace_dir)
    }

    /// Catkin source space, e.g. `~/catkin_ws/src`.
    #[must_use]
    pub fn workspace_src(&self) -> PathBuf {
        self.workspace_root().join("src")
    }

    /// Parent of standalone checkouts, e.g. `~/ut-amrl`.
    #[must_use]
    pub fn standalone_root(&self) -> PathBuf {
        self.home.join(&self.standalone_dir)
    }

    #[must_use]
    pub fn workspace_package(&self, url: &str) -> PathBuf {
        self.workspace_src().join(repo_name(url))
    }

    #[must_use]
    pub fn standalone_package(&self, url: &str) -> PathBuf {
        self.standalone_root().join(repo_name(url))
    }

    #[must_use]
    pub fn rosdep_cache(&self) -> PathBuf {
        self.home.join(ROSDEP_CACHE)
    }
}
