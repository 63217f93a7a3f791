use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use appshelf_catalog::{CatalogParser, DEFAULT_CACHE_PATH, DEFAULT_ENDPOINT, MinimumToolkit};
use appshelf_install::{DEFAULT_PROGRAM, SELF_PACKAGE};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint: String,
    pub cache_path: PathBuf,
    pub timeout_ms: u64,
    pub self_package: String,
    pub installer: String,
    /// Running toolkit version; entries requiring a newer one are hidden.
    pub toolkit_version: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            timeout_ms: 1000,
            self_package: SELF_PACKAGE.to_string(),
            installer: DEFAULT_PROGRAM.to_string(),
            toolkit_version: None,
        }
    }
}

impl Config {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn parser(&self) -> Result<CatalogParser> {
        match &self.toolkit_version {
            Some(version) => {
                let compat = MinimumToolkit::parse(version).context("invalid toolkit_version")?;
                Ok(CatalogParser::new(compat))
            }
            None => Ok(CatalogParser::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.self_package, "fyne.io/apps");
        assert_eq!(config.installer, "fyne");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appshelf.toml");
        fs::write(&path, "timeout_ms = 250\ntoolkit_version = \"1.4\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.toolkit_version.as_deref(), Some("1.4"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.parser().is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appshelf.toml");
        fs::write(&path, "endpiont = \"https://example.com\"\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_bad_toolkit_version() {
        let config = Config {
            toolkit_version: Some("one.two".into()),
            ..Config::default()
        };
        assert!(config.parser().is_err());
    }
}
