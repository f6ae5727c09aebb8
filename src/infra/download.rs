//! Usage: Streaming HTTP download into `<path>.tmp`, renamed into place on success.

use crate::shared::error::{AppError, AppResult};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DownloadTimeouts {
    pub connect: Duration,
    pub total: Duration,
}

/// Installer downloads go direct; proxy environment variables are not consulted.
pub(crate) fn build_client(timeouts: DownloadTimeouts) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .user_agent(format!("claude-config-hub/{}", env!("CARGO_PKG_VERSION")))
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.total)
        .build()
        .map_err(|e| AppError::Http(format!("failed to build http client: {e}")))
}

/// Bytes received so far and the `Content-Length` when the server sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

impl ChunkProgress {
    pub(crate) fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|t| *t > 0)?;
        let pct = (self.downloaded.saturating_mul(100) / total).min(100);
        Some(pct as u8)
    }
}

fn temp_path_for(save_path: &Path) -> PathBuf {
    let mut name = save_path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Downloads `url` to `save_path`. `on_chunk` runs after every received chunk; returning
/// `ControlFlow::Break` stops the transfer with [`AppError::Cancelled`].
///
/// Any failure removes the partial `.tmp` file; `save_path` is only touched by the final rename.
pub(crate) async fn download_to_file(
    client: &reqwest::Client,
    url: &str,
    save_path: &Path,
    mut on_chunk: impl FnMut(ChunkProgress) -> ControlFlow<()>,
) -> AppResult<u64> {
    let tmp_path = temp_path_for(save_path);
    let result = stream_into(client, url, &tmp_path, &mut on_chunk).await;
    match result {
        Ok(written) => {
            tokio::fs::rename(&tmp_path, save_path)
                .await
                .map_err(|e| AppError::io("failed to rename", &tmp_path, e))?;
            tracing::debug!(url, path = %save_path.display(), bytes = written, "download finished");
            Ok(written)
        }
        Err(err) => {
            if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp_path.display(), "failed to remove partial download: {}", e);
                }
            }
            Err(err)
        }
    }
}

async fn stream_into(
    client: &reqwest::Client,
    url: &str,
    tmp_path: &Path,
    on_chunk: &mut impl FnMut(ChunkProgress) -> ControlFlow<()>,
) -> AppResult<u64> {
    let mut resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Http(format!("request failed: {e}")))?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(AppError::Http(format!("HTTP {}", status.as_u16())));
    }

    let total = resp.content_length();
    if let Some(dir) = tmp_path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::io("failed to create", dir, e))?;
    }
    let mut file = tokio::fs::File::create(tmp_path)
        .await
        .map_err(|e| AppError::io("failed to create", tmp_path, e))?;

    let mut downloaded: u64 = 0;
    loop {
        let chunk = match resp.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Err(AppError::Http(format!("failed to read body: {e}"))),
        };
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::io("failed to write", tmp_path, e))?;
        downloaded = downloaded.saturating_add(chunk.len() as u64);

        if on_chunk(ChunkProgress { downloaded, total }).is_break() {
            return Err(AppError::Cancelled(format!("download of {url} cancelled")));
        }
    }

    file.flush()
        .await
        .map_err(|e| AppError::io("failed to flush", tmp_path, e))?;
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> reqwest::Client {
        build_client(DownloadTimeouts {
            connect: Duration::from_secs(5),
            total: Duration::from_secs(30),
        })
        .expect("client")
    }

    #[tokio::test]
    async fn downloads_body_and_reports_progress() {
        let body = vec![7u8; 64 * 1024];
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/node.msi");
                then.status(200).body(body.clone());
            })
            .await;
        let tmp = tempfile::tempdir().expect("tempdir");
        let save = tmp.path().join("cache/nodejs-node.msi");

        let mut last = None;
        let written = download_to_file(&client(), &server.url("/node.msi"), &save, |p| {
            last = Some(p);
            ControlFlow::Continue(())
        })
        .await
        .expect("download");

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&save).expect("read"), body);
        assert!(!temp_path_for(&save).exists());
        let last = last.expect("progress");
        assert_eq!(last.total, Some(body.len() as u64));
        assert_eq!(last.percent(), Some(100));
    }

    #[tokio::test]
    async fn non_200_is_an_error_and_leaves_nothing_behind() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("not found");
            })
            .await;
        let tmp = tempfile::tempdir().expect("tempdir");
        let save = tmp.path().join("x.msi");

        let err = download_to_file(&client(), &server.url("/missing"), &save, |_| {
            ControlFlow::Continue(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "INSTALLER_HTTP_ERROR: HTTP 404");
        assert!(!save.exists());
        assert!(!temp_path_for(&save).exists());
    }

    #[tokio::test]
    async fn break_from_callback_cancels_and_removes_partial_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/big");
                then.status(200).body(vec![1u8; 256 * 1024]);
            })
            .await;
        let tmp = tempfile::tempdir().expect("tempdir");
        let save = tmp.path().join("big.bin");

        let err = download_to_file(&client(), &server.url("/big"), &save, |_| {
            ControlFlow::Break(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Cancelled(_)), "{err}");
        assert!(!save.exists());
        assert!(!temp_path_for(&save).exists());
    }

    #[test]
    fn percent_needs_a_known_total() {
        let p = ChunkProgress {
            downloaded: 50,
            total: None,
        };
        assert_eq!(p.percent(), None);
        let p = ChunkProgress {
            downloaded: 50,
            total: Some(200),
        };
        assert_eq!(p.percent(), Some(25));
    }
}
