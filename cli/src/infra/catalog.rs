//! Built-in package profiles for tags that support initial setup.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{HookContext, TagProfile};
use crate::domain::{PackageSpec, Tag};

/// Profile registered for `tag`, if any.
#[must_use]
pub fn profile_for(tag: &Tag) -> Option<TagProfile> {
    match tag.as_str() {
        "see-spot-run" => Some(see_spot_run()),
        _ => None,
    }
}

fn see_spot_run() -> TagProfile {
    TagProfile {
        packages: PackageSpec::new(
            [
                "https://github.com/ut-amrl/spot_ros",
                "https://github.com/dawonn/vectornav",
            ],
            [
                "https://github.com/ut-amrl/amrl_msgs",
                "https://github.com/ut-amrl/spot_autonomy",
                "https://github.com/ut-amrl/k4a_ros",
            ],
        ),
        post_clone: Some(link_spot_autonomy_subtrees),
        post_build: Some(remind_spot_credentials),
    }
}

/// Expose `spot_autonomy`'s nested packages next to the other standalone
/// packages so ROS finds them.
fn link_spot_autonomy_subtrees(ctx: &HookContext<'_>) -> Result<()> {
    let root = ctx.layout.standalone_root();
    let spot = root.join("spot_autonomy");
    safe_symlink(ctx, &spot.join("graph_navigation"), &root.join("graph_navigation"))?;
    safe_symlink(ctx, &spot.join("maps"), &root.join("amrl_maps"))
}

fn remind_spot_credentials(ctx: &HookContext<'_>) -> Result<()> {
    let spot = ctx.layout.standalone_root().join("spot_autonomy");
    if !ctx.fs.exists(&spot.join("launch/start_clearpath_spot.launch")) {
        ctx.reporter.warn(&format!(
            "Additional manual setup is required in {}:\n    \
             1. Copy \"launch/start_clearpath_spot.launch.example\" to\n       \
             \"launch/start_clearpath_spot.launch\"\n    \
             2. In the new file, fill in your Spot robot username, password,\n       \
             and IP address.\n    \
             Never git add, commit, or push this new file.",
            spot.display()
        ));
    }
    Ok(())
}

/// Link `link` to `source` when the source exists and the link target does
/// not. A dangling symlink at `link` is replaced.
///
/// # Errors
///
/// Returns an error if the stale entry cannot be removed or the link created.
pub fn safe_symlink(ctx: &HookContext<'_>, source: &Path, link: &Path) -> Result<()> {
    if !ctx.fs.exists(source) || ctx.fs.exists(link) {
        return Ok(());
    }
    if ctx.fs.entry_exists(link) {
        ctx.fs.remove_file(link)?;
    }
    ctx.reporter
        .step(&format!("Linking {} to {}", link.display(), source.display()));
    ctx.fs.symlink(source, link)
}
