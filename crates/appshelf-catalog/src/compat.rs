//! Compatibility predicates applied to an entry's `Requires` field.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use tracing::debug;

use crate::error::VersionError;

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?(?<major>[0-9]+)(?:\.(?<minor>[0-9]+))?(?:\.(?<patch>[0-9]+))?$").unwrap()
});

/// Decides whether an entry can run in the current environment.
pub trait Compatibility: Send + Sync {
    fn is_compatible(&self, requires: &str) -> bool;
}

impl<F> Compatibility for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_compatible(&self, requires: &str) -> bool {
        self(requires)
    }
}

/// Treats every entry as compatible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Compatibility for AcceptAll {
    fn is_compatible(&self, _requires: &str) -> bool {
        true
    }
}

/// Parse a toolkit version such as `2`, `2.4` or `v2.4.1`; missing parts are zero.
pub fn parse_version(s: &str) -> Result<Version, VersionError> {
    let caps = VERSION_REGEX
        .captures(s.trim())
        .ok_or_else(|| VersionError(s.to_string()))?;

    let part = |name: &str| -> Result<u64, VersionError> {
        caps.name(name)
            .map(|m| m.as_str().parse().map_err(|_| VersionError(s.to_string())))
            .unwrap_or(Ok(0))
    };

    Ok(Version::new(part("major")?, part("minor")?, part("patch")?))
}

/// Reads `Requires` as the minimum toolkit version an entry needs.
///
/// An empty requirement is always satisfied. `>=` prefixes are accepted. A
/// requirement that cannot be parsed is treated as unsatisfied, so the entry
/// is filtered out.
#[derive(Debug, Clone)]
pub struct MinimumToolkit {
    running: Version,
}

impl MinimumToolkit {
    pub fn new(running: Version) -> Self {
        Self { running }
    }

    pub fn parse(running: &str) -> Result<Self, VersionError> {
        parse_version(running).map(Self::new)
    }

    pub fn running(&self) -> &Version {
        &self.running
    }
}

impl Compatibility for MinimumToolkit {
    fn is_compatible(&self, requires: &str) -> bool {
        let requires = requires.trim();
        if requires.is_empty() {
            return true;
        }

        let minimum = requires.strip_prefix(">=").unwrap_or(requires);
        match parse_version(minimum) {
            Ok(minimum) => minimum <= self.running,
            Err(e) => {
                debug!(requires, error = %e, "unparsable requirement, treating as incompatible");
                false
            }
        }
    }
}
