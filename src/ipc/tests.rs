use super::*;
use crate::app_paths::AppPaths;
use crate::domain::installer::InstallStep;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

fn state_in(home: &Path) -> (AppState, Outbox, mpsc::UnboundedReceiver<String>) {
    let (outbox, rx) = Outbox::channel();
    let state = AppState::new(AppPaths::from_home(home.to_path_buf()), Arc::new(outbox.clone()))
        .expect("state");
    (state, outbox, rx)
}

#[tokio::test]
async fn create_then_scan_through_dispatch() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, _outbox, _rx) = state_in(tmp.path());

    let created = dispatch(
        &state,
        "skills_create",
        json!({ "input": { "name": "demo", "description": "Demo skill", "providers": ["claude", "trae"] } }),
    )
    .await
    .expect("create");
    assert_eq!(created["success"], true);
    assert!(tmp.path().join(".trae/skills/demo/SKILL.md").is_file());

    let scan = dispatch(&state, "skills_scan", Value::Null).await.expect("scan");
    assert_eq!(scan["all_skills"], json!(["demo"]));
    assert_eq!(scan["providers"]["claude"][0]["description"], "Demo skill");
    assert_eq!(scan["providers"]["codex"], json!([]));
    assert!(scan["paths"]["antigravity"]
        .as_str()
        .expect("path")
        .ends_with("antigravity/skills"));

    let synced = dispatch(&state, "skills_sync", json!({ "targets": ["codex"] }))
        .await
        .expect("sync");
    assert_eq!(synced["success"], true);
    assert!(tmp.path().join(".codex/skills/demo/SKILL.md").is_file());
}

#[tokio::test]
async fn unknown_command_and_bad_args_are_invalid_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, _outbox, _rx) = state_in(tmp.path());

    let err = dispatch(&state, "skills_explode", Value::Null).await.unwrap_err();
    assert_eq!(err, "SEC_INVALID_INPUT: unknown command: skills_explode");

    let err = dispatch(&state, "skills_delete", json!({ "nom": "x" })).await.unwrap_err();
    assert!(err.starts_with("SEC_INVALID_INPUT: invalid args for skills_delete"), "{err}");

    let err = dispatch(&state, "skills_sync", json!({ "targets": ["cursor"] }))
        .await
        .unwrap_err();
    assert!(err.starts_with("SEC_INVALID_INPUT:"), "{err}");
}

#[tokio::test]
async fn claude_presets_round_trip() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, _outbox, _rx) = state_in(tmp.path());

    let presets = json!({
        "proxy": { "env": { "ANTHROPIC_BASE_URL": "https://proxy.local" }, "model": "opus",
                   "includeCoAuthoredBy": false, "permissions": { "allow": [], "deny": [] } }
    });
    let saved = dispatch(&state, "claude_presets_save", json!({ "presets": presets }))
        .await
        .expect("save");
    assert_eq!(saved, json!(true));

    let missing = dispatch(&state, "claude_presets_apply", json!({ "name": "nope" }))
        .await
        .expect("apply");
    assert_eq!(missing, json!({ "success": false }));

    let applied = dispatch(&state, "claude_presets_apply", json!({ "name": "proxy" }))
        .await
        .expect("apply");
    assert_eq!(applied["success"], true);
    assert_eq!(applied["config"]["model"], "opus");

    let loaded = dispatch(&state, "claude_config_load", Value::Null).await.expect("load");
    assert_eq!(loaded["env"]["ANTHROPIC_BASE_URL"], "https://proxy.local");

    assert_eq!(
        dispatch(&state, "claude_presets_delete", json!({ "name": "proxy" })).await,
        Ok(json!(true))
    );
    assert_eq!(
        dispatch(&state, "claude_presets_delete", json!({ "name": "proxy" })).await,
        Ok(json!(false))
    );
}

#[tokio::test]
async fn codex_commands_use_home_layout() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, _outbox, _rx) = state_in(tmp.path());

    let raw = dispatch(&state, "codex_config_raw", Value::Null).await.expect("raw");
    assert_eq!(raw, json!(""));

    let config = dispatch(&state, "codex_config_load", Value::Null).await.expect("load");
    assert_eq!(config["model_provider"], "openai");

    let saved = dispatch(&state, "codex_config_save", json!({ "config": config }))
        .await
        .expect("save");
    assert_eq!(saved["model"], "gpt-4");
    let raw = dispatch(&state, "codex_config_raw", Value::Null).await.expect("raw");
    assert!(raw.as_str().expect("text").contains("model_provider = \"openai\""));

    let path = dispatch(&state, "codex_auth_path", Value::Null).await.expect("path");
    assert_eq!(
        path,
        json!(tmp.path().join(".codex").join("auth.json").display().to_string())
    );
}

#[tokio::test]
async fn settings_commands_persist_under_app_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, _outbox, _rx) = state_in(tmp.path());

    let current = dispatch(&state, "settings_get", Value::Null).await.expect("get");
    assert_eq!(current["log_retention_days"], 7);

    let mut next = current.clone();
    next["log_retention_days"] = json!(14);
    let saved = dispatch(&state, "settings_set", json!({ "settings": next }))
        .await
        .expect("set");
    assert_eq!(saved["log_retention_days"], 14);
    assert!(tmp.path().join(".claude-config/settings.json").is_file());
}

#[tokio::test]
async fn progress_is_forwarded_as_named_event() {
    let (outbox, mut rx) = Outbox::channel();
    outbox.emit(InstallProgress {
        tool_id: "codex".to_string(),
        step: InstallStep::Installing,
        progress: 30,
        message: "Installing...".to_string(),
    });

    let line = rx.recv().await.expect("line");
    let value: Value = serde_json::from_str(&line).expect("json");
    assert_eq!(value["event"], "installer:progress:codex");
    assert_eq!(value["payload"]["toolId"], "codex");
    assert_eq!(value["payload"]["step"], "installing");
}

#[tokio::test]
async fn serve_answers_every_line_and_closes_output() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (state, outbox, rx) = state_in(tmp.path());

    let input = [
        r#"{"id": 1, "cmd": "skills_paths"}"#,
        "",
        r#"{"id": 2, "cmd": "installer_cancel", "args": {"toolId": "nodejs"}}"#,
        r#"{"id": 7, "cmd": 5}"#,
        "not json",
        r#"{"id": 3, "cmd": "nope"}"#,
    ]
    .join("\n");

    let output = serve(state, input.as_bytes(), outbox, rx, Vec::<u8>::new())
        .await
        .expect("serve");

    let text = String::from_utf8(output).expect("utf8");
    let replies: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(replies.len(), 5, "{text}");

    let by_id = |id: Value| {
        replies
            .iter()
            .find(|r| r["id"] == id)
            .cloned()
            .unwrap_or_else(|| panic!("no reply for {id}: {text}"))
    };
    let paths = by_id(json!(1));
    assert_eq!(paths["ok"], true);
    assert!(paths["data"]["claude"].as_str().expect("path").ends_with("skills"));

    let cancel = by_id(json!(2));
    assert_eq!(cancel["ok"], true);
    assert_eq!(cancel["data"], Value::Null);

    let malformed = by_id(json!(7));
    assert_eq!(malformed["ok"], false);
    assert!(malformed["error"]
        .as_str()
        .expect("error")
        .starts_with("SEC_INVALID_INPUT: malformed request"));

    let unparsable = by_id(Value::Null);
    assert_eq!(unparsable["ok"], false);

    let unknown = by_id(json!(3));
    assert_eq!(unknown["error"], "SEC_INVALID_INPUT: unknown command: nope");
}
