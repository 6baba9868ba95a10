//! Build-target tags and the rules that make a directory one.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;

use crate::domain::error::TagError;

/// Directory under the repository root that holds one subdirectory per tag.
pub const TAGS_DIR: &str = "noetic";

/// Files a tag directory must contain: image definition, build recipe,
/// service composition.
pub const REQUIRED_FILES: [&str; 3] = ["Dockerfile", "Makefile", "compose.yaml"];

/// Name of a build target, e.g. `see-spot-run`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// Wrap a directory name. Callers only get here through discovery or a
    /// parser restricted to discovered names.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` when every required file is present in `present`.
#[must_use]
pub fn has_required_files(present: &[&str]) -> bool {
    REQUIRED_FILES.iter().all(|f| present.contains(f))
}

/// Comma-separated list of tags, for help text and errors.
#[must_use]
pub fn join_tags(tags: &BTreeSet<Tag>) -> String {
    tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(", ")
}

/// Look up `name` among the discovered tags.
///
/// # Errors
///
/// Returns [`TagError::Unknown`] listing the valid tags.
pub fn find_tag(tags: &BTreeSet<Tag>, name: &str) -> Result<Tag> {
    tags.iter()
        .find(|t| t.as_str() == name)
        .cloned()
        .ok_or_else(|| {
            TagError::Unknown {
                tag: name.to_string(),
                valid: join_tags(tags),
            }
            .into()
        })
}
