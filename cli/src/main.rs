//! rosdock - build and launch ROS Noetic development containers

use std::process::ExitCode;

use rosdock_cli::app::{load_config, resolve_root};
use rosdock_cli::application::ports::TagRegistry;
use rosdock_cli::cli::Cli;
use rosdock_cli::domain::RosdockConfig;
use rosdock_cli::infra::tags::DirTagRegistry;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ROSDOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = async {
        // A broken config file must not block `rosdock config set`.
        let config = load_config().unwrap_or_else(|e| {
            tracing::warn!("{e:#}");
            RosdockConfig::default()
        });
        let root = resolve_root(&config)?;
        let tags = DirTagRegistry::new(&root).list_tags();
        tracing::debug!(root = %root.display(), tags = tags.len(), "discovered tags");
        Cli::parse_with_tags(&tags).run(config, root, &tags).await
    }
    .await;

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
