use std::fmt;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use appshelf_fetch::{HttpClient, read_body};
use tracing::debug;

use crate::error::SourceError;

/// Published catalog endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://apps.fyne.io/api/v1/list.json";

/// Fallback catalog copy, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "testdata/list.json";

/// Where a catalog stream was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Cache,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Remote => write!(f, "remote"),
            Origin::Cache => write!(f, "cache"),
        }
    }
}

/// Raw catalog bytes from one source.
///
/// The underlying handle is released when the stream is closed or dropped.
pub struct CatalogStream {
    origin: Origin,
    reader: Box<dyn Read + Send>,
}

impl CatalogStream {
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Release the underlying handle.
    pub fn close(self) {}
}

impl Read for CatalogStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for CatalogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogStream")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Acquires catalog streams from the remote endpoint or the local cache file.
pub struct CatalogSource<C: HttpClient> {
    client: C,
    endpoint: String,
    cache_path: PathBuf,
}

impl<C: HttpClient> CatalogSource<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_path
    }

    /// Issue one GET to the endpoint, bounded by `timeout`.
    ///
    /// Timeouts, connection failures and non-2xx statuses are all
    /// [`SourceError::Network`]. The body is read in full before returning
    /// so the timeout covers the whole transfer.
    pub async fn fetch_remote(&self, timeout: Duration) -> Result<CatalogStream, SourceError> {
        let body = read_body(&self.client, &self.endpoint, timeout)
            .await
            .map_err(|source| SourceError::Network {
                url: self.endpoint.clone(),
                source,
            })?;

        debug!(url = %self.endpoint, bytes = body.len(), "remote catalog fetched");
        Ok(CatalogStream {
            origin: Origin::Remote,
            reader: Box::new(Cursor::new(body)),
        })
    }

    /// Read the cache file.
    pub async fn fetch_cached(&self) -> Result<CatalogStream, SourceError> {
        let body = tokio::fs::read(&self.cache_path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => SourceError::NotFound {
                    path: self.cache_path.clone(),
                },
                _ => SourceError::Io {
                    path: self.cache_path.clone(),
                    source,
                },
            })?;

        debug!(path = %self.cache_path.display(), bytes = body.len(), "catalog cache read");
        Ok(CatalogStream {
            origin: Origin::Cache,
            reader: Box::new(Cursor::new(body)),
        })
    }
}
