// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Protocol-relative and absolute references pass through `Url::join`
/// unchanged apart from scheme inheritance; unresolvable input is returned
/// as-is.
///
/// # Examples
/// ```
/// use tierdeck::utils::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://prts.wiki/w/list").unwrap();
/// assert_eq!(resolve(&base, "/images/a.png"), "https://prts.wiki/images/a.png");
/// ```
pub fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve against an optional base, leaving `href` untouched without one.
pub fn resolve_opt(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => resolve(base, href),
        None => href.to_string(),
    }
}
