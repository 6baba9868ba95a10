//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod build;
pub mod compose;
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod git;
pub mod packages;
pub mod tag;

pub use build::{BuildConfig, BuildState, ComposeProject, exit_code};
pub use config::{RosdockConfig, validate_config_key, validate_config_value};
pub use environment::EnvironmentMap;
pub use error::{AuthError, BuildFailure, CloneError, ConfigError, ResolutionError, TagError};
pub use git::GitHubProtocol;
pub use packages::{PackageLayout, PackageSpec};
pub use tag::Tag;
