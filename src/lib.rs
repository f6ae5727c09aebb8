mod app;
mod app_paths;
mod blocking;
mod commands;
mod domain;
mod infra;
mod ipc;
mod settings;
mod shared;

pub use app::AppState;
pub use app_paths::AppPaths;
pub use domain::installer::{InstallProgress, InstallStep, ProgressSink, ToolInstallInfo};
pub use domain::skills;
pub use ipc::{serve, Outbox};
pub use settings::AppSettings;
pub use shared::error::{AppError, AppResult};

use std::sync::Arc;
use tokio::io::BufReader;

/// Runs the stdio host until stdin closes.
pub fn run() -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Process(format!("failed to start async runtime: {e}")))?;
    runtime.block_on(run_async())
}

async fn run_async() -> AppResult<()> {
    let paths = AppPaths::resolve()?;
    if let Err(err) = paths.ensure_app_dir() {
        eprintln!("{err}");
    }
    app::logging::init(&paths);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        home = %paths.home_dir().display(),
        "claude-config-hub starting"
    );

    let (outbox, rx) = Outbox::channel();
    let state = AppState::new(paths, Arc::new(outbox.clone()))?;
    state.prepare();

    serve(
        state,
        BufReader::new(tokio::io::stdin()),
        outbox,
        rx,
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
