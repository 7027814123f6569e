//! Object metadata fetch and lookup orchestration.

use cephmeta_model::AccessLevel;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, StatusCode, Uri};
use tracing::debug;

use crate::acl::resolve_acl;
use crate::body::ObjectBody;
use crate::bucket::Bucket;
use crate::error::{CephMetaError, CephMetaResult};
use crate::key::resolve_key;

/// Metadata of an object, plus its unread body.
///
/// `reader` is the live response body. Ownership passes to the caller, who
/// must consume it or release it with [`ObjectBody::close`]; until then the
/// connection it was read from stays open.
#[derive(Debug)]
#[must_use = "FileMeta owns an open response body"]
pub struct FileMeta {
    /// Object content, not yet read.
    pub reader: ObjectBody,
    /// Size in bytes, always greater than zero.
    pub filesize: u64,
    /// Value of the `content-type` header, never empty.
    pub mimetype: String,
    /// Access level collapsed from the object's ACL.
    pub acl: AccessLevel,
}

/// Look up an object by URL: resolve its key, then fetch its metadata and ACL.
///
/// An empty key (the bucket name does not occur in the URL) fails with
/// [`CephMetaError::EmptyObjectKey`] before any request is made.
pub async fn fetch_from_url(url: &Uri, bucket: &Bucket) -> CephMetaResult<FileMeta> {
    let key = resolve_key(url, bucket.name());
    if key.is_empty() {
        return Err(CephMetaError::EmptyObjectKey {
            url: url.to_string(),
            bucket: bucket.name().to_owned(),
        });
    }

    fetch_file_meta(bucket, &key).await
}

/// Fetch an object and its ACL and assemble a [`FileMeta`].
///
/// Checks run in order: transport, status, `content-length`, `content-type`,
/// then ACL. On any failure the object body is dropped here and never
/// returned.
pub async fn fetch_file_meta(bucket: &Bucket, key: &str) -> CephMetaResult<FileMeta> {
    let response = bucket.get_object(key).await?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!(bucket = %bucket.name(), key = %key, %status, "object fetch returned non-200");
        return Err(CephMetaError::NotSuccessHttpStatus { status });
    }

    let filesize = content_length(response.headers())?;
    let mimetype = content_type(response.headers())?;

    let acl = resolve_acl(bucket, key).await?;

    debug!(
        bucket = %bucket.name(),
        key = %key,
        filesize,
        mimetype = %mimetype,
        acl = %acl,
        "fetched file meta"
    );

    Ok(FileMeta {
        reader: response.into_body(),
        filesize,
        mimetype,
        acl,
    })
}

/// Positive `content-length`, or [`CephMetaError::FileInvalidSize`].
fn content_length(headers: &HeaderMap) -> CephMetaResult<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|size| *size > 0)
        .ok_or(CephMetaError::FileInvalidSize)
}

/// Non-empty `content-type`, or [`CephMetaError::MimeTypeNotRecognized`].
fn content_type(headers: &HeaderMap) -> CephMetaResult<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(CephMetaError::MimeTypeNotRecognized)
}
