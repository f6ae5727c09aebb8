//! Usage: Built-in tool catalog (Node.js, Claude Code CLI, Codex CLI) and url/command templating.

const NODE_VERSION: &str = "20.11.0";
const NPM_REGISTRY: &str = "https://registry.npmmirror.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub verify_command: String,
    /// Tried in order; templates may use `{platform}` and `{arch}`.
    pub download_urls: Vec<String>,
    /// May use `{installer}` and `{installDir}`.
    pub install_command: Option<String>,
    pub depends_on: Vec<String>,
    /// Binary name under the npm global prefix, for npm-installed tools.
    pub npm_bin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolSpec>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolSpec>) -> Self {
        Self { tools }
    }

    pub fn builtin() -> Self {
        let npm_install = |package: &str| {
            Some(format!("npm install -g {package} --registry={NPM_REGISTRY}"))
        };
        Self::new(vec![
            ToolSpec {
                id: "nodejs".to_string(),
                name: "Node.js".to_string(),
                description: "JavaScript runtime (v20 LTS)".to_string(),
                verify_command: "node --version".to_string(),
                download_urls: vec![
                    format!(
                        "https://npmmirror.com/mirrors/node/v{NODE_VERSION}/node-v{NODE_VERSION}-{{platform}}-{{arch}}.msi"
                    ),
                    format!(
                        "https://nodejs.org/dist/v{NODE_VERSION}/node-v{NODE_VERSION}-{{platform}}-{{arch}}.msi"
                    ),
                ],
                install_command: Some(
                    r#"msiexec /i "{installer}" /quiet /norestart INSTALLDIR="{installDir}""#
                        .to_string(),
                ),
                depends_on: Vec::new(),
                npm_bin: None,
            },
            ToolSpec {
                id: "claude".to_string(),
                name: "Claude Code CLI".to_string(),
                description: "Claude command line tool".to_string(),
                verify_command: "claude --version".to_string(),
                download_urls: Vec::new(),
                install_command: npm_install("@anthropic-ai/claude-code"),
                depends_on: vec!["nodejs".to_string()],
                npm_bin: Some("claude".to_string()),
            },
            ToolSpec {
                id: "codex".to_string(),
                name: "OpenAI Codex CLI".to_string(),
                description: "OpenAI Codex command line tool".to_string(),
                verify_command: "codex --version".to_string(),
                download_urls: Vec::new(),
                install_command: npm_install("@openai/codex"),
                depends_on: vec!["nodejs".to_string()],
                npm_bin: Some("codex".to_string()),
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// Catalog order; `check_all_tools` reports in this order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.id.as_str())
    }
}

/// Node.js distribution naming: `win`/`darwin`/`linux` and `x64`/`arm64`.
pub(crate) fn node_platform(os: &str) -> &str {
    match os {
        "windows" => "win",
        "macos" => "darwin",
        other => other,
    }
}

pub(crate) fn node_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    }
}

pub(crate) fn format_download_url(template: &str, os: &str, arch: &str) -> String {
    template
        .replace("{platform}", node_platform(os))
        .replace("{arch}", node_arch(arch))
}

/// `<tool>-<last url segment>`.
pub(crate) fn installer_filename(tool_id: &str, url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    format!("{tool_id}-{last}")
}

pub(crate) fn expand_install_command(
    template: &str,
    installer: Option<&str>,
    install_dir: &str,
) -> String {
    let mut command = template.to_string();
    if let Some(installer) = installer {
        command = command.replace("{installer}", installer);
    }
    command.replace("{installDir}", install_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_order_and_dependencies() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(catalog.ids().collect::<Vec<_>>(), ["nodejs", "claude", "codex"]);

        let node = catalog.get("nodejs").expect("nodejs");
        assert_eq!(node.download_urls.len(), 2);
        assert!(node.download_urls[0].starts_with("https://npmmirror.com/"));
        assert!(node.depends_on.is_empty());

        for id in ["claude", "codex"] {
            let tool = catalog.get(id).expect("tool");
            assert_eq!(tool.depends_on, ["nodejs"]);
            assert!(tool.download_urls.is_empty());
            let cmd = tool.install_command.as_deref().expect("install command");
            assert!(cmd.starts_with("npm install -g "), "{cmd}");
        }
        assert!(catalog.get("gemini").is_none());
    }

    #[test]
    fn download_urls_use_node_dist_names() {
        let url = format_download_url(
            "https://nodejs.org/dist/v20.11.0/node-v20.11.0-{platform}-{arch}.msi",
            "windows",
            "x86_64",
        );
        assert_eq!(url, "https://nodejs.org/dist/v20.11.0/node-v20.11.0-win-x64.msi");
        assert_eq!(format_download_url("{platform}-{arch}", "macos", "aarch64"), "darwin-arm64");
        assert_eq!(format_download_url("{platform}-{arch}", "linux", "x86"), "linux-x86");
    }

    #[test]
    fn installer_filename_takes_last_segment() {
        assert_eq!(
            installer_filename("nodejs", "https://x/y/node-v20.11.0-win-x64.msi"),
            "nodejs-node-v20.11.0-win-x64.msi"
        );
    }

    #[test]
    fn install_command_placeholders() {
        let template = r#"msiexec /i "{installer}" INSTALLDIR="{installDir}""#;
        assert_eq!(
            expand_install_command(template, Some("C:/c/node.msi"), "C:/t/nodejs"),
            r#"msiexec /i "C:/c/node.msi" INSTALLDIR="C:/t/nodejs""#
        );
        assert_eq!(
            expand_install_command(template, None, "/t"),
            r#"msiexec /i "{installer}" INSTALLDIR="/t""#
        );
    }
}
