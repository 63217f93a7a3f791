//! Pure helpers shared by the effect layer.

use url::Url;

/// Whether an HTTP status code counts as success.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Name for a resource loaded from `url`: the last segment of its path.
///
/// Trailing slashes are ignored, an empty path yields `"."` and a bare root
/// yields `"/"`.
pub fn resource_name(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rsplit_once('/') {
        Some((_, last)) => last.to_string(),
        None => trimmed.to_string(),
    }
}
