use std::fmt;
use std::time::Duration;

use bytes::Bytes;

/// Hard timeout applied to every outbound request unless a caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Name carried by the built-in placeholder resource.
pub const PLACEHOLDER_NAME: &str = "warning.svg";

const PLACEHOLDER_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path fill="#ffc107" d="M1 21h22L12 2 1 21zm12-3h-2v-2h2v2zm0-4h-2v-4h2v4z"/></svg>"##;

/// Where an [`ImageResource`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Bytes downloaded from the requested URL.
    Remote,
    /// The built-in warning image substituted after a failed download.
    Placeholder,
}

/// An in-memory named image ready for rendering.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageResource {
    name: String,
    content: Bytes,
    kind: ImageKind,
}

impl ImageResource {
    pub fn remote(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: ImageKind::Remote,
        }
    }

    /// The warning image shown in place of anything that failed to load.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            content: Bytes::from_static(PLACEHOLDER_SVG),
            kind: ImageKind::Placeholder,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == ImageKind::Placeholder
    }
}

impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResource")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .field("kind", &self.kind)
            .finish()
    }
}
