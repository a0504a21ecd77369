//! URL helpers shared by the harvester and the orchestrator.

use anyhow::{Context, Result};
use url::Url;

use super::constants::{DEFAULT_FILENAME, MIN_CANDIDATE_LEN};

/// Resolve a potentially relative URL against a base URL
///
/// Handles absolute, root-relative, path-relative and protocol-relative
/// (`//cdn.example.com/x.jpg`) references. Only `http`/`https` results are
/// accepted; anything else (e.g. `javascript:`) is an error.
pub fn resolve_url(base: &Url, raw: &str) -> Result<Url> {
    let resolved = base
        .join(raw.trim())
        .with_context(|| format!("Failed to resolve '{raw}' against {base}"))?;

    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(anyhow::anyhow!("Unsupported scheme '{other}' in {resolved}")),
    }
}

/// Check whether a raw candidate string is worth resolving at all
///
/// Empty strings, strings shorter than four characters and `data:` URIs are
/// never candidates.
#[must_use]
pub fn is_candidate(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_CANDIDATE_LEN {
        return false;
    }
    !trimmed
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
}

/// Derive a filename from the last path segment of a URL
///
/// The query string never contributes. Falls back to `image.jpg` when the
/// URL has no path segments or the last one is empty.
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| DEFAULT_FILENAME.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").expect("valid base")
    }

    #[test]
    fn resolves_relative_and_protocol_relative() {
        let b = base();
        assert_eq!(
            resolve_url(&b, "/a.jpg").expect("root relative").as_str(),
            "https://example.com/a.jpg"
        );
        assert_eq!(
            resolve_url(&b, "img/b.png").expect("path relative").as_str(),
            "https://example.com/blog/img/b.png"
        );
        assert_eq!(
            resolve_url(&b, "//cdn.example.com/c.jpg")
                .expect("protocol relative")
                .as_str(),
            "https://cdn.example.com/c.jpg"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(resolve_url(&base(), "javascript:void(0)").is_err());
        assert!(resolve_url(&base(), "mailto:someone@example.com").is_err());
    }

    #[test]
    fn candidate_filter() {
        assert!(!is_candidate(""));
        assert!(!is_candidate("a.j"));
        assert!(!is_candidate("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_candidate("DATA:image/gif;base64,R0lGOD"));
        assert!(is_candidate("/a.jpg"));
    }

    #[test]
    fn candidate_length_counts_characters() {
        assert!(!is_candidate("ééé"));
        assert!(is_candidate("éééé"));
    }

    #[test]
    fn filename_defaults() {
        let url = Url::parse("https://example.com/images/photo.jpg?w=300").expect("valid");
        assert_eq!(filename_from_url(&url), "photo.jpg");

        let url = Url::parse("https://example.com/images/").expect("valid");
        assert_eq!(filename_from_url(&url), DEFAULT_FILENAME);

        let url = Url::parse("https://example.com").expect("valid");
        assert_eq!(filename_from_url(&url), DEFAULT_FILENAME);
    }
}
