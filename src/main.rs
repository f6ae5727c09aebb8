// Keep stdout clean: it carries the IPC stream.
fn main() {
    if let Err(err) = claude_config_hub_lib::run() {
        eprintln!("claude-config-hub: {err}");
        std::process::exit(1);
    }
}
