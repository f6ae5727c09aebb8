//! Usage: Newline-delimited JSON host over stdin/stdout.
//!
//! - request:  `{"id": 1, "cmd": "skills_scan", "args": {...}}`
//! - response: `{"id": 1, "ok": true, "data": ...}` / `{"id": 1, "ok": false, "error": "..."}`
//! - event:    `{"event": "installer:progress:<tool>", "payload": {...}}`
//!
//! Requests run concurrently; each response carries its request id. Arg objects use camelCase keys.

use crate::app::AppState;
use crate::commands;
use crate::domain::installer::{progress_event_name, InstallProgress, ProgressSink};
use crate::domain::skills::{Provider, SkillCreateInput, SyncTargets};
use crate::infra::claude_settings::ClaudeConfig;
use crate::infra::codex_config::{CodexAuth, CodexConfig};
use crate::infra::presets::Presets;
use crate::settings::AppSettings;
use crate::shared::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

#[derive(Debug, Deserialize)]
struct Request {
    id: u64,
    cmd: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Option<u64>,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    fn from_result(id: Option<u64>, result: Result<Value, String>) -> Self {
        match result {
            Ok(data) => Self {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Event<'a, T> {
    event: &'a str,
    payload: T,
}

/// Sending half of the stdout line queue. Doubles as the installer's progress sink.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<String>,
}

impl Outbox {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => {
                if self.tx.send(line).is_err() {
                    tracing::debug!("ipc: output closed, dropping message");
                }
            }
            Err(err) => tracing::error!("ipc: failed to encode message: {}", err),
        }
    }

    pub fn emit_event<T: Serialize>(&self, event: &str, payload: T) {
        self.send_json(&Event { event, payload });
    }
}

impl ProgressSink for Outbox {
    fn emit(&self, progress: InstallProgress) {
        let event = progress_event_name(&progress.tool_id);
        self.emit_event(&event, progress);
    }
}

/// Reads requests until EOF, waits for in-flight requests, then drains the output queue.
///
/// `state` is dropped before draining so the progress sink it holds releases the queue.
pub async fn serve<R, W>(
    state: AppState,
    input: R,
    outbox: Outbox,
    rx: mpsc::UnboundedReceiver<String>,
    output: W,
) -> AppResult<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = tokio::spawn(write_lines(rx, output));
    let mut inflight = JoinSet::new();
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!("ipc: failed to read input: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<Request>(&line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!("ipc: malformed request: {}", err);
                let id = serde_json::from_str::<Value>(&line)
                    .ok()
                    .and_then(|v| v.get("id").and_then(Value::as_u64));
                let error = AppError::invalid(format!("malformed request: {err}")).to_string();
                outbox.send_json(&Response::from_result(id, Err(error)));
                continue;
            }
        };

        let state = state.clone();
        let outbox = outbox.clone();
        inflight.spawn(async move {
            tracing::debug!(id = request.id, cmd = %request.cmd, "ipc request");
            let result = dispatch(&state, &request.cmd, request.args).await;
            if let Err(err) = &result {
                tracing::warn!(id = request.id, cmd = %request.cmd, "command failed: {}", err);
            }
            outbox.send_json(&Response::from_result(Some(request.id), result));
        });
    }

    while let Some(joined) = inflight.join_next().await {
        if let Err(err) = joined {
            tracing::error!("ipc: request task failed: {}", err);
        }
    }
    drop(state);
    drop(outbox);

    match writer.await {
        Ok(result) => result.map_err(|e| AppError::Process(format!("failed to write output: {e}"))),
        Err(err) => Err(AppError::Process(format!("output writer failed: {err}"))),
    }
}

async fn write_lines<W: AsyncWrite + Unpin>(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut output: W,
) -> std::io::Result<W> {
    while let Some(line) = rx.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(output)
}

fn parse_args<T: DeserializeOwned>(cmd: &str, args: Value) -> Result<T, String> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AppError::invalid(format!("invalid args for {cmd}: {e}")).to_string())
}

fn to_data<T: Serialize>(result: Result<T, String>) -> Result<Value, String> {
    let value = result?;
    serde_json::to_value(value).map_err(|e| format!("IPC_ENCODE_ERROR: {e}"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameArgs {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncArgs {
    #[serde(default = "sync_all")]
    targets: SyncTargets,
}

fn sync_all() -> SyncTargets {
    SyncTargets::All
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    input: SkillCreateInput,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportArgs {
    source_path: PathBuf,
    target_providers: Vec<Provider>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CopyArgs {
    skill_names: Vec<String>,
    target_path: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigArgs<T> {
    config: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetsArgs<T> {
    presets: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthArgs {
    auth: CodexAuth,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolArgs {
    tool_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallArgs {
    tool_id: String,
    #[serde(default)]
    installer_path: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsArgs {
    settings: AppSettings,
}

/// Routes one command to its handler; the `Ok` value becomes the response `data`.
pub(crate) async fn dispatch(state: &AppState, cmd: &str, args: Value) -> Result<Value, String> {
    match cmd {
        "skills_scan" => to_data(commands::skills_scan(state).await),
        "skills_paths" => to_data(commands::skills_paths(state).await),
        "skills_sync" => {
            let a: SyncArgs = parse_args(cmd, args)?;
            to_data(commands::skills_sync(state, a.targets).await)
        }
        "skills_create" => {
            let a: CreateArgs = parse_args(cmd, args)?;
            to_data(commands::skills_create(state, a.input).await)
        }
        "skills_delete" => {
            let a: NameArgs = parse_args(cmd, args)?;
            to_data(commands::skills_delete(state, a.name).await)
        }
        "skills_import" => {
            let a: ImportArgs = parse_args(cmd, args)?;
            to_data(commands::skills_import(state, a.source_path, a.target_providers).await)
        }
        "skills_copy" => {
            let a: CopyArgs = parse_args(cmd, args)?;
            to_data(commands::skills_copy(state, a.skill_names, a.target_path).await)
        }

        "claude_config_load" => to_data(commands::claude_config_load(state).await),
        "claude_config_save" => {
            let a: ConfigArgs<ClaudeConfig> = parse_args(cmd, args)?;
            to_data(commands::claude_config_save(state, a.config).await)
        }
        "claude_config_path" => to_data(commands::claude_config_path(state).await),
        "claude_presets_load" => to_data(commands::claude_presets_load(state).await),
        "claude_presets_save" => {
            let a: PresetsArgs<Presets<ClaudeConfig>> = parse_args(cmd, args)?;
            to_data(commands::claude_presets_save(state, a.presets).await)
        }
        "claude_presets_apply" => {
            let a: NameArgs = parse_args(cmd, args)?;
            to_data(commands::claude_presets_apply(state, a.name).await)
        }
        "claude_presets_delete" => {
            let a: NameArgs = parse_args(cmd, args)?;
            to_data(commands::claude_presets_delete(state, a.name).await)
        }

        "codex_config_load" => to_data(commands::codex_config_load(state).await),
        "codex_config_save" => {
            let a: ConfigArgs<CodexConfig> = parse_args(cmd, args)?;
            to_data(commands::codex_config_save(state, a.config).await)
        }
        "codex_config_raw" => to_data(commands::codex_config_raw(state).await),
        "codex_config_path" => to_data(commands::codex_config_path(state).await),
        "codex_auth_load" => to_data(commands::codex_auth_load(state).await),
        "codex_auth_save" => {
            let a: AuthArgs = parse_args(cmd, args)?;
            to_data(commands::codex_auth_save(state, a.auth).await)
        }
        "codex_auth_path" => to_data(commands::codex_auth_path(state).await),
        "codex_presets_load" => to_data(commands::codex_presets_load(state).await),
        "codex_presets_save" => {
            let a: PresetsArgs<Presets<CodexConfig>> = parse_args(cmd, args)?;
            to_data(commands::codex_presets_save(state, a.presets).await)
        }
        "codex_presets_apply" => {
            let a: NameArgs = parse_args(cmd, args)?;
            to_data(commands::codex_presets_apply(state, a.name).await)
        }
        "codex_presets_delete" => {
            let a: NameArgs = parse_args(cmd, args)?;
            to_data(commands::codex_presets_delete(state, a.name).await)
        }

        "installer_check_tool" => {
            let a: ToolArgs = parse_args(cmd, args)?;
            to_data(commands::installer_check_tool(state, a.tool_id).await)
        }
        "installer_check_all" => to_data(commands::installer_check_all(state).await),
        "installer_download" => {
            let a: ToolArgs = parse_args(cmd, args)?;
            to_data(commands::installer_download(state, a.tool_id).await)
        }
        "installer_install" => {
            let a: InstallArgs = parse_args(cmd, args)?;
            to_data(commands::installer_install(state, a.tool_id, a.installer_path).await)
        }
        "installer_verify" => {
            let a: ToolArgs = parse_args(cmd, args)?;
            to_data(commands::installer_verify(state, a.tool_id).await)
        }
        "installer_cancel" => {
            let a: ToolArgs = parse_args(cmd, args)?;
            to_data(commands::installer_cancel(state, a.tool_id).await)
        }

        "settings_get" => to_data(commands::settings_get(state).await),
        "settings_set" => {
            let a: SettingsArgs = parse_args(cmd, args)?;
            to_data(commands::settings_set(state, a.settings).await)
        }

        other => Err(AppError::invalid(format!("unknown command: {other}")).to_string()),
    }
}

#[cfg(test)]
mod tests;
