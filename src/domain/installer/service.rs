use super::catalog::{self, ToolCatalog, ToolSpec};
use super::shell;
use super::{InstallProgress, InstallStep, ProgressSink, ToolInstallInfo};
use crate::app_paths::AppPaths;
use crate::infra::download::{self, ChunkProgress, DownloadTimeouts};
use crate::settings::AppSettings;
use crate::shared::error::{AppError, AppResult};
use crate::shared::mutex_ext::MutexExt;
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const PROGRESS_THROTTLE: Duration = Duration::from_millis(500);
const UNKNOWN_TOOL: &str = "Unknown tool";

#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub cache_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub download_connect_timeout: Duration,
    pub download_total_timeout: Duration,
    pub install_timeout: Duration,
    pub verify_timeout: Duration,
}

impl InstallerConfig {
    pub fn from_settings(paths: &AppPaths, settings: &AppSettings) -> Self {
        let secs = |s: u32| Duration::from_secs(u64::from(s));
        Self {
            cache_dir: paths.cache_dir(),
            tools_dir: paths.tools_dir(),
            download_connect_timeout: secs(settings.download_connect_timeout_seconds),
            download_total_timeout: secs(settings.download_total_timeout_seconds),
            install_timeout: secs(settings.install_command_timeout_seconds),
            verify_timeout: secs(settings.verify_command_timeout_seconds),
        }
    }
}

pub struct InstallerService {
    catalog: ToolCatalog,
    config: InstallerConfig,
    client: reqwest::Client,
    sink: Arc<dyn ProgressSink>,
    /// tool id -> downloaded installer path
    install_cache: Mutex<HashMap<String, PathBuf>>,
    /// tool id -> download still wanted
    active_downloads: Mutex<HashMap<String, bool>>,
}

impl InstallerService {
    pub fn new(
        catalog: ToolCatalog,
        config: InstallerConfig,
        sink: Arc<dyn ProgressSink>,
    ) -> AppResult<Self> {
        let client = download::build_client(DownloadTimeouts {
            connect: config.download_connect_timeout,
            total: config.download_total_timeout,
        })?;
        Ok(Self {
            catalog,
            config,
            client,
            sink,
            install_cache: Mutex::new(HashMap::new()),
            active_downloads: Mutex::new(HashMap::new()),
        })
    }

    fn tool(&self, tool_id: &str) -> AppResult<&ToolSpec> {
        self.catalog
            .get(tool_id)
            .ok_or_else(|| AppError::invalid(format!("{UNKNOWN_TOOL}: {tool_id}")))
    }

    fn install_dir(&self, tool_id: &str) -> PathBuf {
        self.config.tools_dir.join(tool_id)
    }

    fn send(&self, tool_id: &str, step: InstallStep, progress: u8, message: impl Into<String>) {
        self.sink.emit(InstallProgress {
            tool_id: tool_id.to_string(),
            step,
            progress,
            message: message.into(),
        });
    }

    fn is_download_active(&self, tool_id: &str) -> bool {
        self.active_downloads
            .lock_or_recover()
            .get(tool_id)
            .copied()
            .unwrap_or(false)
    }

    pub async fn check_tool(&self, tool_id: &str) -> ToolInstallInfo {
        let Some(tool) = self.catalog.get(tool_id) else {
            return ToolInstallInfo {
                installed: false,
                error: Some(UNKNOWN_TOOL.to_string()),
                ..ToolInstallInfo::default()
            };
        };

        match shell::run_capture(&tool.verify_command, self.config.verify_timeout).await {
            Ok(stdout) => {
                let version = stdout.strip_prefix('v').unwrap_or(&stdout).to_string();
                ToolInstallInfo {
                    installed: true,
                    version: Some(version),
                    path: Some(self.tool_path(tool).await),
                    error: None,
                }
            }
            Err(err) => {
                tracing::debug!(tool = tool_id, "tool check failed: {}", err);
                ToolInstallInfo::default()
            }
        }
    }

    async fn tool_path(&self, tool: &ToolSpec) -> String {
        let Some(bin) = tool.npm_bin.as_deref() else {
            return self.install_dir(&tool.id).display().to_string();
        };
        match shell::run_capture("npm config get prefix", self.config.verify_timeout).await {
            Ok(prefix) if !prefix.is_empty() => Path::new(&prefix).join(bin).display().to_string(),
            _ => bin.to_string(),
        }
    }

    pub async fn check_all_tools(&self) -> BTreeMap<String, ToolInstallInfo> {
        let mut out = BTreeMap::new();
        for id in self.catalog.ids() {
            out.insert(id.to_string(), self.check_tool(id).await);
        }
        out
    }

    /// Tries every download source in order; the first success lands in the cache dir.
    pub async fn download_tool(&self, tool_id: &str) -> AppResult<PathBuf> {
        let tool = self.tool(tool_id)?;
        if tool.download_urls.is_empty() {
            return Err(AppError::invalid(format!(
                "{tool_id} does not support downloading"
            )));
        }
        let urls: Vec<String> = tool
            .download_urls
            .iter()
            .map(|u| catalog::format_download_url(u, std::env::consts::OS, std::env::consts::ARCH))
            .collect();

        let cache_dir = &self.config.cache_dir;
        tokio::fs::create_dir_all(cache_dir)
            .await
            .map_err(|e| AppError::io("failed to create", cache_dir, e))?;
        let save_path = cache_dir.join(catalog::installer_filename(tool_id, &urls[0]));

        self.active_downloads
            .lock_or_recover()
            .insert(tool_id.to_string(), true);

        let mut last_error: Option<AppError> = None;
        for (i, url) in urls.iter().enumerate() {
            let source = if i == 0 {
                "primary mirror".to_string()
            } else {
                format!("fallback source {i}")
            };
            // a cancel can land while the previous source is failing
            if !self.is_download_active(tool_id) {
                return Err(self.download_cancelled(tool_id));
            }
            self.send(tool_id, InstallStep::Downloading, 0, format!("Trying {source}..."));

            match self.download_one(tool_id, url, &save_path).await {
                Ok(bytes) => {
                    tracing::info!(tool = tool_id, url = %url, bytes, "installer downloaded");
                    self.send(
                        tool_id,
                        InstallStep::Downloading,
                        100,
                        format!("Download complete ({source})"),
                    );
                    self.install_cache
                        .lock_or_recover()
                        .insert(tool_id.to_string(), save_path.clone());
                    return Ok(save_path);
                }
                Err(AppError::Cancelled(_)) => return Err(self.download_cancelled(tool_id)),
                Err(err) => {
                    tracing::warn!(tool = tool_id, url = %url, "download failed ({source}): {}", err);
                    if i + 1 < urls.len() {
                        self.send(
                            tool_id,
                            InstallStep::Downloading,
                            0,
                            format!("{source} failed, trying next source..."),
                        );
                    }
                    last_error = Some(err);
                }
            }
        }

        let message = format!(
            "all download sources failed: {}",
            last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string())
        );
        self.send(tool_id, InstallStep::Failed, 0, message.clone());
        Err(AppError::Http(message))
    }

    fn download_cancelled(&self, tool_id: &str) -> AppError {
        tracing::info!(tool = tool_id, "download cancelled");
        self.send(tool_id, InstallStep::Failed, 0, "Download cancelled");
        AppError::Cancelled(format!("download of {tool_id} cancelled"))
    }

    async fn download_one(&self, tool_id: &str, url: &str, save_path: &Path) -> AppResult<u64> {
        let mut last_emit: Option<Instant> = None;
        download::download_to_file(&self.client, url, save_path, |chunk: ChunkProgress| {
            if let Some(pct) = chunk.percent() {
                let due = last_emit.map_or(true, |t| t.elapsed() > PROGRESS_THROTTLE);
                if due {
                    self.send(
                        tool_id,
                        InstallStep::Downloading,
                        pct,
                        format!("Downloading... {pct}%"),
                    );
                    last_emit = Some(Instant::now());
                }
            }
            if self.is_download_active(tool_id) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
        .await
    }

    /// Runs the tool's install command after its dependencies check out.
    ///
    /// `{installer}` resolves to `installer_path`, else the last downloaded installer.
    pub async fn install_tool(&self, tool_id: &str, installer_path: Option<&Path>) -> AppResult<bool> {
        let tool = self.tool(tool_id)?;

        for dep in &tool.depends_on {
            if !self.check_tool(dep).await.installed {
                return Err(AppError::Process(format!("install {dep} first")));
            }
        }

        self.send(tool_id, InstallStep::Installing, 0, "Starting install...");
        match self.run_install(tool, installer_path).await {
            Ok(()) => {
                tracing::info!(tool = tool_id, "tool installed");
                self.send(tool_id, InstallStep::Installing, 100, "Install complete");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(tool = tool_id, "install failed: {}", err);
                self.send(tool_id, InstallStep::Failed, 0, format!("Install failed: {err}"));
                Err(err)
            }
        }
    }

    async fn run_install(&self, tool: &ToolSpec, installer_path: Option<&Path>) -> AppResult<()> {
        let template = tool
            .install_command
            .as_deref()
            .ok_or_else(|| AppError::invalid(format!("{} has no install command", tool.id)))?;

        let install_dir = self.install_dir(&tool.id);
        std::fs::create_dir_all(&install_dir)
            .map_err(|e| AppError::io("failed to create", &install_dir, e))?;

        let installer = installer_path
            .map(Path::to_path_buf)
            .or_else(|| self.cached_installer(&tool.id));
        if template.contains("{installer}") && installer.is_none() {
            return Err(AppError::invalid(format!(
                "{} needs a downloaded installer",
                tool.id
            )));
        }
        let installer = installer.map(|p| p.display().to_string());
        let command = catalog::expand_install_command(
            template,
            installer.as_deref(),
            &install_dir.display().to_string(),
        );

        self.send(&tool.id, InstallStep::Installing, 30, "Installing...");
        tracing::debug!(tool = %tool.id, command = %command, "running install command");
        shell::run_capture(&command, self.config.install_timeout).await?;
        Ok(())
    }

    pub async fn verify_installation(&self, tool_id: &str) -> bool {
        self.send(tool_id, InstallStep::Verifying, 0, "Verifying install...");
        let info = self.check_tool(tool_id).await;
        if info.installed {
            let version = info.version.as_deref().unwrap_or("unknown");
            self.send(
                tool_id,
                InstallStep::Completed,
                100,
                format!("Installed successfully. Version: {version}"),
            );
            true
        } else {
            self.send(tool_id, InstallStep::Failed, 0, "Verification failed");
            false
        }
    }

    /// Stops an in-flight download at its next chunk and drops the cached installer.
    pub fn cancel_installation(&self, tool_id: &str) {
        self.active_downloads
            .lock_or_recover()
            .insert(tool_id.to_string(), false);

        let cached = self.install_cache.lock_or_recover().remove(tool_id);
        if let Some(path) = cached {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::info!(tool = tool_id, path = %path.display(), "cached installer removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(tool = tool_id, path = %path.display(), "failed to delete cached installer: {}", e)
                }
            }
        }
    }

    pub fn cached_installer(&self, tool_id: &str) -> Option<PathBuf> {
        self.install_cache.lock_or_recover().get(tool_id).cloned()
    }
}
