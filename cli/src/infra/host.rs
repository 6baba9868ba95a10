//! Infrastructure implementation of the `HostIdentity` port.

use crate::application::ports::HostIdentity;
use crate::domain::environment::HostIdentityValues;

/// Reads the invoking user from the operating system.
pub struct OsHostIdentity;

impl HostIdentity for OsHostIdentity {
    fn identity(&self) -> HostIdentityValues {
        HostIdentityValues {
            user: whoami::username(),
            uid: current_uid(),
            hostname: whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string()),
        }
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}

// Containers run as root on hosts without POSIX users.
#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}
