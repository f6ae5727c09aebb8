use regex::Regex;
use std::sync::OnceLock;

pub const MANIFEST_FILE: &str = "SKILL.md";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub(crate) const CREATE_PLACEHOLDER_DESCRIPTION: &str = "No description provided";
const TEMPLATE_VERSION: &str = "1.0.0";

fn description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)description:\s*(.*)").expect("description regex"))
}

/// First `description:` value anywhere in the manifest text.
pub(crate) fn extract_description(text: &str) -> Option<String> {
    let caps = description_re().captures(text)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

pub(crate) fn render_template(name: &str, description: Option<&str>) -> String {
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(CREATE_PLACEHOLDER_DESCRIPTION);
    format!(
        "---\nname: {name}\ndescription: {description}\nversion: {TEMPLATE_VERSION}\n---\n\n# {name}\n\n{description}\n"
    )
}
