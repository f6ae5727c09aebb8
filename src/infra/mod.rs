pub(crate) mod claude_settings;
pub(crate) mod codex_config;
pub(crate) mod download;
pub(crate) mod json_file;
pub(crate) mod presets;
