use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::core::resource_name;
use crate::data::{DEFAULT_TIMEOUT, ImageResource};
use crate::effects::http::{HttpClient, read_body};
use crate::error::{FetchError, Result};

/// Resolves remote image URLs into in-memory resources.
///
/// Failures never reach the caller of [`AssetFetcher::resolve`]: they are
/// logged and replaced with [`ImageResource::placeholder`].
pub struct AssetFetcher<C: HttpClient> {
    client: C,
    timeout: Duration,
}

impl<C: HttpClient> AssetFetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve `location` into an image.
    ///
    /// Returns `None` without issuing a request when `location` is empty, in
    /// which case the caller keeps whatever it currently shows.
    pub async fn resolve(&self, location: &str) -> Option<ImageResource> {
        if location.is_empty() {
            return None;
        }

        match self.load(location).await {
            Ok(resource) => {
                debug!(url = location, name = resource.name(), "image loaded");
                Some(resource)
            }
            Err(e) => {
                warn!(url = location, error = %e, "image load failed, using placeholder");
                Some(ImageResource::placeholder())
            }
        }
    }

    /// Download `location`, surfacing any failure.
    pub async fn load(&self, location: &str) -> Result<ImageResource> {
        let parsed =
            Url::parse(location).map_err(|e| FetchError::InvalidUrl(format!("{location}: {e}")))?;
        let content = read_body(&self.client, location, self.timeout).await?;

        Ok(ImageResource::remote(resource_name(&parsed), content))
    }
}
