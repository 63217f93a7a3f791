use std::io;
use std::path::PathBuf;

use appshelf_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch catalog from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("catalog cache not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open catalog cache {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
#[error("invalid toolkit version: {0}")]
pub struct VersionError(pub String);
