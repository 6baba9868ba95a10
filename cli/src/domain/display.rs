//! X display selection rules.
//!
//! Sometimes a display device can be opened but applications cannot use it.
//! This happens when several users are logged into the GUI and the device
//! does not belong to the last one. `glxinfo` hangs on such a display, so a
//! short timeout detects it; `xdpyinfo` would report success.

use std::ops::Range;
use std::time::Duration;

/// Display numbers probed, in order.
pub const CANDIDATES: Range<u32> = 0..100;

/// Hard per-candidate probe limit.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Tool used to open candidate displays.
pub const PROBE_TOOL: &str = "glxinfo";

/// Value of `DISPLAY` meaning "no display".
pub const NO_DISPLAY: &str = "";

/// `DISPLAY` value for a display number.
#[must_use]
pub fn display_name(num: u32) -> String {
    format!(":{num}")
}

/// What the user chose when no display is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreChoice {
    /// Continue without a display this time.
    Once,
    /// Continue and never check again.
    Always,
    /// Stop.
    Abort,
}

/// Interpret a `[YES/ALWAYS/NO]` answer. Only the first letter matters.
#[must_use]
pub fn parse_ignore_choice(answer: &str) -> IgnoreChoice {
    let answer = answer.trim().to_lowercase();
    if answer.starts_with('a') {
        IgnoreChoice::Always
    } else if answer.starts_with('y') {
        IgnoreChoice::Once
    } else {
        IgnoreChoice::Abort
    }
}

pub const IGNORE_PROMPT: &str = "Ignore this warning? [YES/ALWAYS/NO]";

/// Default answer in non-interactive mode.
pub const IGNORE_DEFAULT: &str = "yes";

const IGNORE_OPTIONS: &str = "\
    If you do not use GUI applications or the Azure Kinect DK Camera, you may
    ignore this warning.

    Your options are:
        YES    : Ignore once. This warning will appear again in the future.
        ALWAYS : Always ignore this warning.
        NO     : Follow the steps below to resolve this warning.";

/// Warning shown when the probe tool is not installed.
#[must_use]
pub fn tool_missing_warning() -> String {
    format!(
        "Command not found: {PROBE_TOOL}
    This tool uses {PROBE_TOOL} from the mesa-utils package to detect
    accessible X display devices. An X display device is required for GUI
    applications and the Azure Kinect DK Camera SDK.

{IGNORE_OPTIONS}

    Steps to resolve this warning:
        - Install {PROBE_TOOL} with 'sudo apt install mesa-utils'"
    )
}

/// Warning shown when no candidate display could be opened.
#[must_use]
pub fn no_display_warning(hostname: &str) -> String {
    format!(
        "Unable to remotely access an X display device.
    An X display device is required for GUI applications and the Azure Kinect DK
    Camera SDK.

{IGNORE_OPTIONS}

    Steps to resolve this warning:
        - Create an X session on \"{hostname}\" by logging into the
          GUI on the physical machine.
        - Run \"xhost +\" in a terminal on the physical machine. This allows any
          host to access the running X server.
        - Lock the screen on the physical machine. Do not log out of the GUI
          session. Logging out of the GUI session will close the X session."
    )
}
