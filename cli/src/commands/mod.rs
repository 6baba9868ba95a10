//! Command implementations

pub mod build;
pub mod build_packages;
pub mod config;
pub mod env;
pub mod launch;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::{ContainerEngine, ProgressReporter};
use crate::application::services::environment::{DisplayCheck, resolve_environment};
use crate::domain::{BuildConfig, EnvironmentMap};
use crate::infra::display::GlxinfoProber;
use crate::infra::fs::LocalFs;
use crate::infra::host::OsHostIdentity;

/// Resolve the child-process environment with the production adapters.
async fn environment_for(
    app: &AppContext,
    config: &BuildConfig,
    engine: &impl ContainerEngine,
    reporter: &impl ProgressReporter,
) -> Result<EnvironmentMap> {
    let prober = GlxinfoProber::default_runner();
    let prompter = app.prompter();
    let skip_file = app.skip_display_file();
    let check = DisplayCheck {
        prober: &prober,
        prompter: &prompter,
        fs: &LocalFs,
        reporter,
        skip_file: &skip_file,
    };
    resolve_environment(config, &OsHostIdentity, engine, &check).await
}
