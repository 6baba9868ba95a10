//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, docker compose, git, display probing, and configuration storage.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod catalog;
pub mod command_runner;
pub mod compose;
pub mod config;
pub mod display;
pub mod fs;
pub mod git;
pub mod host;
pub mod prompt;
pub mod tags;
