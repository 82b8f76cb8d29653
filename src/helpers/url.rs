//! URL helper functions

/// Join a base URL and path segments with single slashes
///
/// # Examples
/// ```ignore
/// join_url("/content/blogs/", &["auth", "styles.css"]) // -> "/content/blogs/auth/styles.css"
/// ```
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();

    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }

    if url.is_empty() {
        "/".to_string()
    } else {
        url
    }
}

/// Prefix that `./assets/` references are rewritten to, with a trailing slash
pub fn asset_prefix(base_url: &str, slug: &str) -> String {
    format!("{}/", join_url(base_url, &[slug, "assets"]))
}

/// Public URL of a post's optional stylesheet
pub fn styles_url(base_url: &str, slug: &str, file: &str) -> String {
    join_url(base_url, &[slug, file])
}
