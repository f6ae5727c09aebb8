use super::*;

#[test]
fn missing_settings_load_as_empty_default() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let file = ClaudeSettingsFile::from_home(tmp.path());
    let config = file.load();
    assert_eq!(config, ClaudeConfig::default());
    assert!(config.permissions.allow.is_empty());
}

#[test]
fn unknown_keys_survive_a_load_save_cycle() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let file = ClaudeSettingsFile::from_home(tmp.path());
    json_file::write_text(
        file.path(),
        r#"{
  "env": {"ANTHROPIC_BASE_URL": "https://proxy.local", "DISABLE_TELEMETRY": "1"},
  "model": "opus",
  "includeCoAuthoredBy": true,
  "permissions": {"allow": ["Bash(ls:*)"], "deny": [], "defaultMode": "plan"},
  "hooks": {"PostToolUse": []},
  "statusLine": {"type": "command"}
}"#,
    )
    .expect("seed");

    let mut config = file.load();
    assert_eq!(config.model, "opus");
    assert!(config.include_co_authored_by);
    assert_eq!(config.permissions.allow, ["Bash(ls:*)"]);
    assert_eq!(
        config.env.get("ANTHROPIC_BASE_URL"),
        Some(&serde_json::Value::String("https://proxy.local".to_string()))
    );

    config.model = "sonnet".to_string();
    file.save(&config).expect("save");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).expect("read")).expect("json");
    assert_eq!(raw["model"], "sonnet");
    assert_eq!(raw["includeCoAuthoredBy"], true);
    assert_eq!(raw["permissions"]["defaultMode"], "plan");
    assert!(raw["hooks"]["PostToolUse"].is_array());
    assert_eq!(raw["statusLine"]["type"], "command");
}

#[test]
fn malformed_settings_fall_back_to_default() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let file = ClaudeSettingsFile::from_home(tmp.path());
    json_file::write_text(file.path(), "{ not json").expect("seed");
    assert_eq!(file.load(), ClaudeConfig::default());
}

#[test]
fn presets_live_next_to_but_outside_the_claude_dir() {
    let path = presets_path(Path::new("/home/dev"));
    assert_eq!(path, PathBuf::from("/home/dev/.claude_presets/presets.json"));
}
