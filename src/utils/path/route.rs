//! Route and link utilities.
//!
//! - Route composition (`parent + "/" + segment`)
//! - Link type detection (external vs local)

/// Route of the content root.
pub const ROOT_ROUTE: &str = "/";

/// Join a parent route and a path segment.
///
/// The root route is `/`; the separator is never doubled.
///
/// # Examples
/// ```
/// use folio::utils::path::route::join_route;
/// assert_eq!(join_route("/", "blog"), "/blog");
/// assert_eq!(join_route("/blog", "hello-world"), "/blog/hello-world");
/// ```
#[inline]
pub fn join_route(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), segment)
}

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
///
/// A valid scheme must:
/// - Have at least 2 characters before the colon (so `C:\img.png` stays local)
/// - Start with an ASCII letter
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// Protocol-relative links (`//cdn.example.com/a.png`) are external too.
///
/// # Examples
/// ```
/// use folio::utils::path::route::is_external_link;
/// assert!(is_external_link("https://example.com/a.png"));
/// assert!(is_external_link("//cdn.example.com/a.png"));
/// assert!(!is_external_link("./cover.png"));
/// assert!(!is_external_link("/assets/cover.png"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    link.find(':').is_some_and(|pos| {
        pos > 1
            && link[..pos].starts_with(|c: char| c.is_ascii_alphabetic())
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            && url::Url::parse(link).is_ok()
    })
}

/// Strip a `?query` or `#fragment` suffix from a local link.
///
/// # Examples
/// ```
/// use folio::utils::path::route::strip_query_fragment;
/// assert_eq!(strip_query_fragment("cover.png?raw#top"), "cover.png");
/// assert_eq!(strip_query_fragment("cover.png"), "cover.png");
/// ```
#[inline]
pub fn strip_query_fragment(link: &str) -> &str {
    link.split(['?', '#']).next().unwrap_or(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_route() {
        assert_eq!(join_route("/", "blog"), "/blog");
        assert_eq!(join_route("", "blog"), "/blog");
        assert_eq!(join_route("/blog", "post"), "/blog/post");
        assert_eq!(join_route("/blog/", "post"), "/blog/post");
    }

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("http://example.com/img.png"));
        assert!(is_external_link("data:image/png;base64,AAAA"));
        assert!(is_external_link("//cdn.example.com/img.png"));

        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.png"));
        assert!(!is_external_link("../images/file.png"));
        assert!(!is_external_link("image.png"));
        assert!(!is_external_link("C:\\images\\file.png"));
    }

    #[test]
    fn test_strip_query_fragment() {
        assert_eq!(strip_query_fragment("a.png#x"), "a.png");
        assert_eq!(strip_query_fragment("a.png?v=1"), "a.png");
        assert_eq!(strip_query_fragment(""), "");
    }
}
