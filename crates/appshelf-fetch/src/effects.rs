mod asset;
mod http;

pub use asset::AssetFetcher;
pub use http::{BoxStream, HttpClient, read_body};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
