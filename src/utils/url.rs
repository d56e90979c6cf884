// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Drop the query string and fragment from a URL.
///
/// # Examples
/// ```
/// use catalog_crawler::utils::url::strip_query;
///
/// assert_eq!(
///     strip_query("https://example.com/products/a?variant=1#top"),
///     "https://example.com/products/a"
/// );
/// ```
pub fn strip_query(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}

/// The path segment following `marker`, e.g. the collection slug.
pub fn path_segment_after(url: &str, marker: &str) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let rest = &url[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let segment = &rest[..end];
    (!segment.is_empty()).then(|| segment.to_string())
}

/// URL of listing page `page` (1-based). Page 1 is the base URL unmodified.
pub fn page_url(base: &str, page: usize) -> String {
    if page <= 1 {
        return base.to_string();
    }
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
            url.to_string()
        }
        Err(_) => format!("{base}?page={page}"),
    }
}

/// Turn an image source into an absolute HTTPS URL.
///
/// Protocol-relative sources get `https:`; site-relative sources are joined
/// onto `origin`. Returns `None` when the source cannot be made absolute.
pub fn absolutize(src: &str, origin: Option<&str>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    let origin = origin?;
    Url::parse(origin)
        .ok()?
        .join(src)
        .ok()
        .map(|u| u.to_string())
}
