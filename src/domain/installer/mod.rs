//! Usage: Check, download and install the CLIs this app manages.

mod catalog;
mod service;
mod shell;


pub use catalog::{ToolCatalog, ToolSpec};
pub use service::{InstallerConfig, InstallerService};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolInstallInfo {
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStep {
    Checking,
    Downloading,
    Installing,
    Configuring,
    Verifying,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallProgress {
    pub tool_id: String,
    pub step: InstallStep,
    pub progress: u8,
    pub message: String,
}

/// Receives progress for a tool; the host forwards it as `installer:progress:<tool>`.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: InstallProgress);
}

pub fn progress_event_name(tool_id: &str) -> String {
    format!("installer:progress:{tool_id}")
}
