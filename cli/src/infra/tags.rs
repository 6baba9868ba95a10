//! Infrastructure implementation of the `TagRegistry` port.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::application::ports::TagRegistry;
use crate::domain::Tag;
use crate::domain::tag::{TAGS_DIR, has_required_files};

/// Scans `<root>/noetic/` for directories holding every required file.
pub struct DirTagRegistry {
    root: PathBuf,
}

impl DirTagRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TagRegistry for DirTagRegistry {
    fn list_tags(&self) -> BTreeSet<Tag> {
        let dir = self.root.join(TAGS_DIR);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            tracing::debug!(dir = %dir.display(), "no tag directory");
            return BTreeSet::new();
        };

        entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let files: Vec<String> = std::fs::read_dir(e.path())
                    .ok()?
                    .filter_map(Result::ok)
                    .filter(|f| f.path().is_file())
                    .filter_map(|f| f.file_name().into_string().ok())
                    .collect();
                let names: Vec<&str> = files.iter().map(String::as_str).collect();
                if !has_required_files(&names) {
                    return None;
                }
                e.file_name().into_string().ok().map(Tag::new)
            })
            .collect()
    }
}
