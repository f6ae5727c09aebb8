//! Usage: Run a command line through the platform shell with a hard timeout.

use crate::shared::error::{AppError, AppResult};
use std::time::Duration;
use tokio::process::Command;

fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Trimmed stdout on exit code 0. Non-zero exit, spawn failure and timeout are
/// [`AppError::Process`]; the child is killed when the timeout fires.
pub(crate) async fn run_capture(command_line: &str, timeout: Duration) -> AppResult<String> {
    let mut cmd = shell_command(command_line);
    cmd.stdin(std::process::Stdio::null()).kill_on_drop(true);

    let out = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => {
            return Err(AppError::Process(format!(
                "failed to execute `{command_line}`: {e}"
            )))
        }
        Err(_) => {
            return Err(AppError::Process(format!(
                "`{command_line}` timed out after {}s",
                timeout.as_secs()
            )))
        }
    };

    if out.status.success() {
        return Ok(String::from_utf8_lossy(&out.stdout).trim().to_string());
    }
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
    let msg = if !stderr.is_empty() { stderr } else { stdout };
    Err(AppError::Process(format!(
        "`{command_line}` exited with {}: {msg}",
        out.status
    )))
}
