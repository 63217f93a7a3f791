//! Bounded-timeout HTTP fetching and image resolution.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable resource types and defaults
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Single Request**: Every call is one GET with a hard timeout, never retried
//! - **Client Seam**: [`HttpClient`] keeps callers testable without a network
//! - **Absorbing Images**: [`AssetFetcher`] turns any failure into a placeholder

mod core;
mod data;
mod effects;
mod error;

pub use core::{is_success, resource_name};
pub use data::{DEFAULT_TIMEOUT, ImageKind, ImageResource, PLACEHOLDER_NAME};
pub use effects::{AssetFetcher, BoxStream, HttpClient, read_body};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
