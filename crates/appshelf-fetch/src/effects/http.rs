use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

use crate::error::{FetchError, Result};

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed by the catalog, image
/// and icon paths. Implementations issue exactly one GET per call, enforce
/// the given timeout over the whole exchange and report non-2xx responses as
/// errors before any body is yielded.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Into<FetchError> + Send + 'static;

    /// Open a GET request and return the response body as a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (invalid URL, DNS failure,
    /// connection error, timeout or non-2xx status).
    fn stream(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>>
           + Send;
}

impl<C: HttpClient> HttpClient for std::sync::Arc<C> {
    type Error = C::Error;

    fn stream(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>>
           + Send {
        (**self).stream(url, timeout)
    }
}

/// Read a whole response body into memory.
pub async fn read_body<C: HttpClient>(client: &C, url: &str, timeout: Duration) -> Result<Bytes> {
    let mut stream = client.stream(url, timeout).await.map_err(Into::into)?;
    let mut body = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.map_err(Into::into)?);
    }

    Ok(body.freeze())
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::core::is_success;
    use tracing::debug;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("appshelf/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(FetchError::network)?;
            Ok(Self { client })
        }

        /// Wrap an already configured reqwest client.
        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn map_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else if e.is_builder() {
            FetchError::InvalidUrl(url.to_string())
        } else {
            FetchError::network(e)
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = FetchError;

        async fn stream(
            &self,
            url: &str,
            timeout: Duration,
        ) -> Result<BoxStream<'static, Result<Bytes>>> {
            debug!(url, ?timeout, "GET");

            let response = self
                .client
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| map_error(url, e))?;

            let status = response.status().as_u16();
            if !is_success(status) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let owned = url.to_string();
            let stream = response
                .bytes_stream()
                .map(move |chunk| chunk.map_err(|e| map_error(&owned, e)));

            Ok(Box::pin(stream))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
