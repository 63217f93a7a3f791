//! Catalog entry types as published by the catalog endpoint.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// A JSON `null` leaves the field at its default instead of failing the decode.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One screenshot reference of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Screenshot {
    #[serde(rename = "Image", deserialize_with = "nullable")]
    image: String,
    #[serde(rename = "Type", deserialize_with = "nullable")]
    kind: String,
}

impl Screenshot {
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Type tag, e.g. `desktop` or `mobile`.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Where an entry's code lives and which package identifier installs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Source {
    #[serde(rename = "Git", deserialize_with = "nullable")]
    git: String,
    #[serde(rename = "Package", deserialize_with = "nullable")]
    package: String,
}

impl Source {
    pub fn git(&self) -> &str {
        &self.git
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

/// One application's metadata record.
///
/// Missing fields decode to their empty value and unknown fields are
/// ignored. Entries are read-only once decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(rename = "ID", deserialize_with = "nullable")]
    id: String,
    #[serde(rename = "Name", deserialize_with = "nullable")]
    name: String,
    #[serde(rename = "Icon", deserialize_with = "nullable")]
    icon: String,
    #[serde(rename = "Developer", deserialize_with = "nullable")]
    developer: String,
    #[serde(rename = "Summary", deserialize_with = "nullable")]
    summary: String,
    #[serde(rename = "URL", deserialize_with = "nullable")]
    url: String,
    #[serde(rename = "Website", deserialize_with = "nullable")]
    website: String,
    #[serde(rename = "Screenshots", deserialize_with = "nullable")]
    screenshots: Vec<Screenshot>,
    #[serde(rename = "Date")]
    date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "Version", deserialize_with = "nullable")]
    version: String,
    #[serde(rename = "Source", deserialize_with = "nullable")]
    source: Source,
    #[serde(rename = "Requires", deserialize_with = "nullable")]
    requires: String,
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Icon image URL, possibly empty.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn developer(&self) -> &str {
        &self.developer
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Canonical catalog URL of the entry.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn screenshots(&self) -> &[Screenshot] {
        &self.screenshots
    }

    pub fn date(&self) -> Option<&DateTime<FixedOffset>> {
        self.date.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Package identifier handed to the installer.
    pub fn package(&self) -> &str {
        self.source.package()
    }

    pub fn requires(&self) -> &str {
        &self.requires
    }
}

/// The ordered, filtered list of installable entries.
///
/// Only [`CatalogParser`](crate::CatalogParser) builds catalogs, so every
/// instance is already sorted by name and free of incompatible entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub(crate) fn from_sorted(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Position of the entry whose ID, or failing that whose exact name,
    /// equals `query`.
    pub fn position(&self, query: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == query)
            .or_else(|| self.entries.iter().position(|entry| entry.name == query))
    }

    pub fn find(&self, query: &str) -> Option<&CatalogEntry> {
        self.position(query).and_then(|index| self.entries.get(index))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
