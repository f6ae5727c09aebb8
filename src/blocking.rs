//! Usage: Run filesystem-bound work off the async executor and flatten errors to IPC strings.

pub(crate) async fn run<T, E>(
    label: &'static str,
    f: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> Result<T, String>
where
    T: Send + 'static,
    E: Into<String> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| format!("TASK_JOIN: {label}: {e}"))?
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use crate::shared::error::AppError;

    #[tokio::test]
    async fn flattens_app_errors() {
        let ok = super::run("ok", || Ok::<_, AppError>(3)).await;
        assert_eq!(ok, Ok(3));

        let err = super::run("err", || Err::<(), _>(AppError::invalid("bad name"))).await;
        assert_eq!(err, Err("SEC_INVALID_INPUT: bad name".to_string()));
    }

    #[tokio::test]
    async fn panics_become_join_errors() {
        let err = super::run("boom", || -> Result<(), String> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(err.starts_with("TASK_JOIN: boom:"), "{err}");
    }
}
