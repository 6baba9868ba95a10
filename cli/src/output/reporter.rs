//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
/// - `alert()` prints `"  ⚠ {message}"` to stderr, always
/// - `dump()` writes raw tool output to stderr, always
/// - `begin_task()` / `end_task()` drive a spinner on a TTY
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    task: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            task: RefCell::new(None),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn alert(&self, message: &str) {
        eprintln!("  {} {message}", "⚠".style(self.ctx.styles.warning));
    }

    fn dump(&self, output: &str) {
        eprintln!("{}", output.trim_end());
    }

    fn begin_task(&self, message: &str) {
        if self.ctx.show_progress() {
            *self.task.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.step(message);
        }
    }

    fn end_task(&self, message: &str, ok: bool) {
        match self.task.borrow_mut().take() {
            Some(pb) if ok => progress::finish_ok(&pb, message),
            Some(pb) => progress::finish_error(&pb, message),
            None if ok => self.success(message),
            None => self.ctx.error(message),
        }
    }
}
