//! Object key extraction.

use http::Uri;

/// Derive the store-relative object key from an object URL.
///
/// Returns everything after the first occurrence of `bucket_name` plus one
/// separator character in the URL's string form.
///
/// When the bucket name does not occur in the URL (or nothing follows it) the
/// result is an empty string rather than an error; callers must treat an empty
/// key as "not found".
///
/// # Examples
///
/// ```
/// use cephmeta_core::resolve_key;
///
/// let url: http::Uri = "https://store.example/bucket-a/dir/file.bin".parse().unwrap();
/// assert_eq!(resolve_key(&url, "bucket-a"), "dir/file.bin");
/// assert_eq!(resolve_key(&url, "bucket-b"), "");
/// ```
#[must_use]
pub fn resolve_key(url: &Uri, bucket_name: &str) -> String {
    if bucket_name.is_empty() {
        return String::new();
    }

    let url = url.to_string();
    url.find(bucket_name)
        .and_then(|idx| url.get(idx + bucket_name.len() + 1..))
        .unwrap_or_default()
        .to_owned()
}
