//! Application catalog: model, acquisition and parsing.
//!
//! A catalog is fetched once per cycle through [`CatalogLoader`], which tries
//! the remote endpoint with a hard timeout and falls back to the local cache
//! file. The stream is decoded by [`CatalogParser`], filtered through a
//! [`Compatibility`] predicate and sorted by name.
//!
//! ```no_run
//! use appshelf_catalog::{CatalogLoader, CatalogSource};
//! use appshelf_fetch::ReqwestClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = CatalogSource::new(ReqwestClient::new()?);
//! let loaded = CatalogLoader::new(source).load().await?;
//! for entry in &loaded.catalog {
//!     println!("{}", entry.name());
//! }
//! # Ok(())
//! # }
//! ```

mod compat;
mod data;
mod error;
mod loader;
mod parse;
mod source;

pub use compat::{AcceptAll, Compatibility, MinimumToolkit, parse_version};
pub use data::{Catalog, CatalogEntry, Screenshot, Source};
pub use error::{LoadError, ParseError, SourceError, VersionError};
pub use loader::{CatalogLoader, LoadedCatalog};
pub use parse::{CatalogParser, parse};
pub use source::{CatalogSource, CatalogStream, DEFAULT_CACHE_PATH, DEFAULT_ENDPOINT, Origin};
