//! Rewriting github.com web URLs into raw content URLs.

/// Convert a `github.com/.../blob/...` web URL into its
/// `raw.githubusercontent.com` equivalent. Already-raw URLs and non-GitHub
/// URLs pass through unchanged.
pub fn raw_content_url(url: &str) -> String {
    if url.contains("github.com") && !url.contains("raw.githubusercontent.com") {
        // Only the host and the first "/blob/" are structural; later
        // occurrences are part of the file path.
        url.replacen("github.com", "raw.githubusercontent.com", 1)
            .replacen("/blob/", "/", 1)
    } else {
        url.to_string()
    }
}
