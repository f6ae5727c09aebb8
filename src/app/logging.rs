//! Usage: Tracing/logging initialization (daily file logs + stderr, retention cleanup).
//!
//! stdout carries the IPC stream, so console output always goes to stderr.

use crate::app_paths::AppPaths;
use crate::settings;
use crate::shared::error::{AppError, AppResult};
use crate::shared::mutex_ext::MutexExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;

const LOG_FILE_PREFIX: &str = "claude-config-hub.log";
const CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

static TRACING_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Idempotent. Must run inside a tokio runtime (the cleanup task is spawned on it).
pub(crate) fn init(paths: &AppPaths) {
    TRACING_INIT.get_or_init(|| {
        if let Err(err) = init_impl(paths) {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(default_env_filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .try_init();
            eprintln!("tracing init failed: {err}");
        }
    });
}

fn init_impl(paths: &AppPaths) -> AppResult<()> {
    let log_dir = paths.logs_dir();
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| AppError::io("failed to create log dir", &log_dir, e))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    TRACING_GUARD
        .get_or_init(|| Mutex::new(None))
        .lock_or_recover()
        .replace(guard);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(default_env_filter())
        .with(file_layer)
        .with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        AppError::Process(format!("failed to set global tracing subscriber: {e}"))
    })?;

    // Another `log` logger may already be installed; keep it.
    let _ = tracing_log::LogTracer::init();

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    spawn_cleanup_task(paths.clone(), log_dir);
    Ok(())
}

fn default_env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            tracing_subscriber::EnvFilter::new(
                "info,claude_config_hub_lib=debug,claude_config_hub=debug",
            )
        }
        #[cfg(not(debug_assertions))]
        {
            tracing_subscriber::EnvFilter::new("info")
        }
    })
}

fn spawn_cleanup_task(paths: AppPaths, log_dir: PathBuf) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!("no tokio runtime; log cleanup disabled");
        return;
    };
    handle.spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            // First tick fires immediately: one pass at startup, then daily.
            interval.tick().await;
            let paths = paths.clone();
            let log_dir = log_dir.clone();
            std::mem::drop(tokio::task::spawn_blocking(move || {
                cleanup_once(&paths, &log_dir);
            }));
        }
    });
}

fn cleanup_once(paths: &AppPaths, log_dir: &Path) {
    let retention_days = settings::read_fail_open(paths).log_retention_days.max(1);
    match cleanup_logs(log_dir, retention_days) {
        Ok(deleted) if deleted > 0 => {
            tracing::info!(retention_days, deleted, "cleaned up old log files");
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(retention_days, "log cleanup failed: {}", err);
        }
    }
}

fn cleanup_logs(log_dir: &Path, retention_days: u32) -> AppResult<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(
            u64::from(retention_days.max(1)).saturating_mul(24 * 60 * 60),
        ))
        .unwrap_or(UNIX_EPOCH);

    let mut deleted = 0usize;
    let entries =
        std::fs::read_dir(log_dir).map_err(|e| AppError::io("failed to list", log_dir, e))?;
    for entry in entries {
        let entry = match entry {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!("log cleanup: read_dir entry error: {}", err);
                continue;
            }
        };

        let path = entry.path();
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(path = %path.display(), "log cleanup: metadata error: {}", err);
                continue;
            }
        };
        if !meta.is_file() || meta.modified().unwrap_or(UNIX_EPOCH) >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => deleted = deleted.saturating_add(1),
            Err(err) => {
                tracing::warn!(path = %path.display(), "log cleanup: remove failed: {}", err);
            }
        }
    }

    Ok(deleted)
}
