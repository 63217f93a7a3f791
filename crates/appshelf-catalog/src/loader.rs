use std::time::Duration;

use appshelf_fetch::{DEFAULT_TIMEOUT, HttpClient};
use tracing::{info, warn};

use crate::data::Catalog;
use crate::error::{LoadError, SourceError};
use crate::parse::CatalogParser;
use crate::source::{CatalogSource, CatalogStream, Origin};

/// A parsed catalog together with where its bytes came from.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub origin: Origin,
}

/// One fetch cycle: remote first, cache on network failure, then parse.
pub struct CatalogLoader<C: HttpClient> {
    source: CatalogSource<C>,
    parser: CatalogParser,
    timeout: Duration,
}

impl<C: HttpClient> CatalogLoader<C> {
    pub fn new(source: CatalogSource<C>) -> Self {
        Self {
            source,
            parser: CatalogParser::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn parser(mut self, parser: CatalogParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open the remote stream, or the cache when the endpoint is unreachable.
    ///
    /// A cache failure is returned as-is; the remote error has already been
    /// logged.
    pub async fn open(&self) -> Result<CatalogStream, SourceError> {
        match self.source.fetch_remote(self.timeout).await {
            Ok(stream) => Ok(stream),
            Err(e) => {
                warn!(error = %e, "remote catalog unavailable, reading cache");
                self.source.fetch_cached().await
            }
        }
    }

    pub async fn load(&self) -> Result<LoadedCatalog, LoadError> {
        let stream = self.open().await?;
        let origin = stream.origin();
        let catalog = self.parser.parse(stream)?;

        info!(entries = catalog.len(), %origin, "catalog loaded");
        Ok(LoadedCatalog { catalog, origin })
    }
}
