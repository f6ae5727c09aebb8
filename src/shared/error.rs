//! Usage: Crate-wide error type. Display strings carry a stable code prefix for the frontend.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("SEC_INVALID_INPUT: {0}")]
    InvalidInput(String),

    #[error("SKILL_NOT_FOUND: {0}")]
    NotFound(String),

    #[error("IO_ERROR: {context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SKILL_ZIP_ERROR: {0}")]
    Archive(String),

    #[error("CONFIG_PARSE_ERROR: {0}")]
    Parse(String),

    #[error("INSTALLER_HTTP_ERROR: {0}")]
    Http(String),

    #[error("INSTALLER_PROCESS_ERROR: {0}")]
    Process(String),

    #[error("INSTALLER_CANCELLED: {0}")]
    Cancelled(String),
}

impl AppError {
    pub(crate) fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code_prefix() {
        let err = AppError::invalid("name is required");
        assert_eq!(err.to_string(), "SEC_INVALID_INPUT: name is required");

        let err = AppError::io(
            "failed to read",
            Path::new("/tmp/x"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let s = err.to_string();
        assert!(s.starts_with("IO_ERROR: failed to read /tmp/x"), "{s}");
        assert!(s.ends_with("denied"), "{s}");
    }

    #[test]
    fn converts_into_command_string() {
        let s: String = AppError::Archive("bad entry".to_string()).into();
        assert_eq!(s, "SKILL_ZIP_ERROR: bad entry");
    }
}
