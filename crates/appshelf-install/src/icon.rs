use std::path::Path;
use std::time::Duration;

use appshelf_fetch::HttpClient;
use futures_util::StreamExt;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::IconError;

const ICON_PREFIX: &str = "fyne-icon-";
const ICON_SUFFIX: &str = ".png";

/// Streams the icon at `url` into a new temporary file under `dir`.
///
/// The returned [`TempPath`] deletes the file when dropped; call
/// [`TempPath::close`] to observe removal errors. On failure no file is left
/// behind.
pub async fn download_icon<C: HttpClient>(
    client: &C,
    url: &str,
    timeout: Duration,
    dir: &Path,
) -> Result<TempPath, IconError> {
    let mut stream = client
        .stream(url, timeout)
        .await
        .map_err(|e| IconError::Fetch(e.into()))?;

    let (file, path) = tempfile::Builder::new()
        .prefix(ICON_PREFIX)
        .suffix(ICON_SUFFIX)
        .tempfile_in(dir)
        .map_err(IconError::Create)?
        .into_parts();

    let mut file = tokio::fs::File::from_std(file);
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| IconError::Fetch(e.into()))?;
        file.write_all(&chunk).await.map_err(IconError::Write)?;
        written += chunk.len();
    }
    file.flush().await.map_err(IconError::Write)?;
    drop(file);

    debug!(url, path = %path.display(), bytes = written, "staged icon");
    Ok(path)
}

/// Like [`download_icon`], but failures only log: the install goes ahead
/// without an icon.
pub(crate) async fn stage_icon<C: HttpClient>(
    client: &C,
    url: &str,
    timeout: Duration,
    dir: &Path,
) -> Option<TempPath> {
    if url.is_empty() {
        return None;
    }
    match download_icon(client, url, timeout, dir).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(url, error = %e, "icon unavailable, installing without it");
            None
        }
    }
}
