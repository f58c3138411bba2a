//! Normalized image references.

use std::borrow::Cow;
use std::fmt;

use url::Url;

use crate::utils::fs::sanitize_file_name;

/// Name used when a URL path yields nothing usable.
pub const FALLBACK_FILE_NAME: &str = "unknown.png";

/// An absolute image URL with query and fragment removed.
///
/// Equality, ordering and hashing all work on the normalized string, so two
/// sources pointing at the same image collapse to one reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    /// Normalize a raw `src` value.
    ///
    /// Protocol-relative sources (`//host/x.png`) become `https://host/x.png`.
    /// Returns `None` when nothing is left after normalization.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let absolute: Cow<'_, str> = if trimmed.starts_with("//") {
            Cow::Owned(format!("https:{trimmed}"))
        } else {
            Cow::Borrowed(trimmed)
        };

        let normalized = match Url::parse(&absolute) {
            Ok(mut url) => {
                url.set_query(None);
                url.set_fragment(None);
                url.to_string()
            }
            Err(_) => strip_query_and_fragment(&absolute).to_string(),
        };

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a filesystem-safe file name from the URL path.
    ///
    /// The path is percent-decoded, its last segment sanitized and truncated
    /// to `max_chars` characters. Names without a `.` get `default_ext`.
    pub fn file_name(&self, max_chars: usize, default_ext: &str) -> String {
        let path = match Url::parse(&self.0) {
            Ok(url) => url.path().to_string(),
            Err(_) => self.0.clone(),
        };
        let decoded = match urlencoding::decode(&path) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => path.clone(),
        };

        let base = decoded
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME);

        let mut name = sanitize_file_name(base, max_chars);
        if name.is_empty() {
            name = FALLBACK_FILE_NAME.to_string();
        }
        if !name.contains('.') {
            name.push('.');
            name.push_str(default_ext.trim_start_matches('.'));
        }
        name
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn strip_query_and_fragment(s: &str) -> &str {
    let end = s.find(['?', '#']).unwrap_or(s.len());
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        ImageRef::normalize(raw).unwrap().as_str().to_string()
    }

    #[test]
    fn test_protocol_relative_becomes_https() {
        assert_eq!(norm("//host/img.png"), "https://host/img.png");
    }

    #[test]
    fn test_query_and_fragment_stripped() {
        assert_eq!(
            norm("https://host/a/b.png?width=80#top"),
            "https://host/a/b.png"
        );
        assert_eq!(norm("//host/b.png#x"), "https://host/b.png");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "//media.prts.wiki/c/c8/%E5%A4%B4%E5%83%8F_A.png?v=1",
            "https://host/%E5%A4%B4%E5%83%8F_%E5%BC%A0%E4%B8%89.png",
            "https://host/头像_张三.png?x=1",
            "/relative/path.png?x=1",
            "https://HOST/a.png#frag",
        ];
        for input in inputs {
            let once = ImageRef::normalize(input).unwrap();
            let twice = ImageRef::normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(ImageRef::normalize("").is_none());
        assert!(ImageRef::normalize("   ").is_none());
        assert!(ImageRef::normalize("?only=query").is_none());
    }

    #[test]
    fn test_unparseable_input_stripped_textually() {
        assert_eq!(norm("/images/a.png?x=1"), "/images/a.png");
    }

    #[test]
    fn test_file_name_decodes_and_strips_query() {
        let image = ImageRef::normalize("https://host/images/头像_张三.png?x=1").unwrap();
        assert_eq!(image.file_name(120, "png"), "头像_张三.png");
    }

    #[test]
    fn test_file_name_appends_default_extension() {
        let image = ImageRef::normalize("https://host/images/avatar").unwrap();
        assert_eq!(image.file_name(120, "png"), "avatar.png");
    }

    #[test]
    fn test_file_name_replaces_invalid_characters() {
        let image = ImageRef::normalize("https://host/images/a%3A%2A%3Fb.png").unwrap();
        assert_eq!(image.file_name(120, "png"), "a_b.png");
    }

    #[test]
    fn test_file_name_truncates_by_characters() {
        let image = ImageRef::normalize("https://host/头像头像头像.png").unwrap();
        assert_eq!(image.file_name(4, "png"), "头像头像.png");
    }

    #[test]
    fn test_file_name_falls_back_for_empty_path() {
        let image = ImageRef::normalize("https://host/").unwrap();
        assert_eq!(image.file_name(120, "png"), FALLBACK_FILE_NAME);
    }
}
