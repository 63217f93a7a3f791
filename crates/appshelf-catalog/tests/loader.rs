//! Fetch-then-fallback loading against a scripted HTTP client and a temp cache.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use appshelf_catalog::{
    CatalogLoader, CatalogParser, CatalogSource, LoadError, MinimumToolkit, Origin, ParseError,
    SourceError,
};
use appshelf_fetch::{BoxStream, FetchError, HttpClient};
use bytes::Bytes;
use tempfile::tempdir;

const FIXTURE: &str = include_str!("../../../testdata/list.json");
const ENDPOINT: &str = "https://catalog.test/list.json";

/// Mock HTTP client for testing.
struct TestHttpClient {
    response: Result<Vec<u8>, u16>,
    requests: AtomicUsize,
    last_timeout: std::sync::Mutex<Option<Duration>>,
}

impl TestHttpClient {
    fn ok(body: &str) -> Self {
        Self {
            response: Ok(body.as_bytes().to_vec()),
            requests: AtomicUsize::new(0),
            last_timeout: std::sync::Mutex::new(None),
        }
    }

    fn status(status: u16) -> Self {
        Self {
            response: Err(status),
            requests: AtomicUsize::new(0),
            last_timeout: std::sync::Mutex::new(None),
        }
    }
}

impl HttpClient for TestHttpClient {
    type Error = FetchError;

    async fn stream(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<BoxStream<'static, Result<Bytes, FetchError>>, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_timeout.lock().unwrap() = Some(timeout);

        match &self.response {
            Ok(body) => {
                let chunk: Result<Bytes, FetchError> = Ok(Bytes::from(body.clone()));
                Ok(Box::pin(futures_util::stream::iter(vec![chunk])))
            }
            Err(0) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Err(status) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
        }
    }
}

fn source(client: Arc<TestHttpClient>, cache: &std::path::Path) -> CatalogSource<Arc<TestHttpClient>> {
    CatalogSource::new(client).endpoint(ENDPOINT).cache_path(cache)
}

#[tokio::test]
async fn test_load_prefers_remote() {
    let dir = tempdir().unwrap();
    let client = Arc::new(TestHttpClient::ok(r#"[{"Name":"Zeta"},{"Name":"Alpha"}]"#));
    let loader = CatalogLoader::new(source(client.clone(), &dir.path().join("missing.json")));

    let loaded = loader.load().await.unwrap();

    assert_eq!(loaded.origin, Origin::Remote);
    assert_eq!(loaded.catalog.get(0).unwrap().name(), "Alpha");
    assert_eq!(loaded.catalog.len(), 2);
    assert_eq!(client.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_load_uses_one_second_timeout_by_default() {
    let dir = tempdir().unwrap();
    let client = Arc::new(TestHttpClient::ok("[]"));
    let loader = CatalogLoader::new(source(client.clone(), &dir.path().join("missing.json")));

    loader.load().await.unwrap();

    assert_eq!(*client.last_timeout.lock().unwrap(), Some(Duration::from_secs(1)));
}

#[tokio::test]
async fn test_load_falls_back_to_cache_on_status_error() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("list.json");
    std::fs::write(&cache, FIXTURE).unwrap();
    let client = Arc::new(TestHttpClient::status(503));
    let loader = CatalogLoader::new(source(client.clone(), &cache));

    let loaded = loader.load().await.unwrap();

    assert_eq!(loaded.origin, Origin::Cache);
    let names: Vec<&str> = loaded.catalog.iter().map(|entry| entry.name()).collect();
    assert_eq!(names, ["Apps", "Calculator", "Notes", "Terminal"]);
    assert_eq!(client.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_load_falls_back_to_cache_on_timeout() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("list.json");
    std::fs::write(&cache, "[]").unwrap();
    let loader = CatalogLoader::new(source(Arc::new(TestHttpClient::status(0)), &cache));

    let loaded = loader.load().await.unwrap();

    assert_eq!(loaded.origin, Origin::Cache);
    assert!(loaded.catalog.is_empty());
}

#[tokio::test]
async fn test_load_missing_cache_is_fatal() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("missing.json");
    let loader = CatalogLoader::new(source(Arc::new(TestHttpClient::status(404)), &cache));

    let result = loader.load().await;

    match result {
        Err(LoadError::Source(SourceError::NotFound { path })) => assert_eq!(path, cache),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_malformed_remote_is_fatal() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("list.json");
    std::fs::write(&cache, FIXTURE).unwrap();
    let loader = CatalogLoader::new(source(Arc::new(TestHttpClient::ok(r#"[{"Name":"#)), &cache));

    let result = loader.load().await;

    assert!(matches!(result, Err(LoadError::Parse(ParseError::Decode(_)))));
}

#[tokio::test]
async fn test_load_applies_compatibility_filter() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("list.json");
    std::fs::write(&cache, FIXTURE).unwrap();
    let parser = CatalogParser::new(MinimumToolkit::parse("1.2").unwrap());
    let loader =
        CatalogLoader::new(source(Arc::new(TestHttpClient::status(500)), &cache)).parser(parser);

    let loaded = loader.load().await.unwrap();

    let names: Vec<&str> = loaded.catalog.iter().map(|entry| entry.name()).collect();
    assert_eq!(names, ["Calculator", "Notes"]);
}

#[tokio::test]
async fn test_fetch_remote_maps_to_network_error() {
    let dir = tempdir().unwrap();
    let source = source(Arc::new(TestHttpClient::status(500)), dir.path());

    let result = source.fetch_remote(Duration::from_millis(50)).await;

    match result {
        Err(SourceError::Network { url, source }) => {
            assert_eq!(url, ENDPOINT);
            assert!(matches!(source, FetchError::Status { status: 500, .. }));
        }
        other => panic!("expected Network, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_cached_streams_file() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("list.json");
    std::fs::write(&cache, "[]").unwrap();
    let source = source(Arc::new(TestHttpClient::status(500)), &cache);

    let mut stream = source.fetch_cached().await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).unwrap();
    stream.close();

    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_fetch_cached_unreadable_path_is_io_error() {
    let dir = tempdir().unwrap();
    let source = source(Arc::new(TestHttpClient::status(500)), dir.path());

    match source.fetch_cached().await {
        Err(SourceError::Io { path, .. }) => assert_eq!(path, dir.path()),
        other => panic!("expected Io, got {other:?}"),
    }
}
