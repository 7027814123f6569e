//! AWS Signature Version 2 signing.
//!
//! SigV2 uses HMAC-SHA1. The `Authorization` header has the format:
//!
//! ```text
//! AWS <AWSAccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedAmzHeaders +
//!                CanonicalizedResource
//! ```

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use http::Method;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use tracing::trace;

use crate::credentials::Credentials;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Characters encoded in an object key: everything but unreserved characters and `/`.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Capability that turns a string-to-sign into an `Authorization` header value.
///
/// Keeping this narrow lets callers swap in a fake signer without touching the
/// canonicalization logic.
pub trait Signer: Send + Sync + fmt::Debug {
    /// Produce the `Authorization` header value for `string_to_sign`.
    fn authorization(&self, string_to_sign: &str) -> Result<HeaderValue, AuthError>;
}

/// [`Signer`] producing `AWS <access-key>:<base64 hmac-sha1>` values.
#[derive(Debug, Clone)]
pub struct SigV2Signer {
    credentials: Credentials,
}

impl SigV2Signer {
    /// Create a signer for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The credentials this signer uses.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl Signer for SigV2Signer {
    fn authorization(&self, string_to_sign: &str) -> Result<HeaderValue, AuthError> {
        let access_key = self.credentials.access_key();
        if access_key.is_empty() {
            return Err(AuthError::MissingAccessKey);
        }
        let signature = compute_sigv2_signature(self.credentials.secret_key(), string_to_sign)?;
        Ok(HeaderValue::from_str(&format!("AWS {access_key}:{signature}"))?)
    }
}

/// The CanonicalizedResource part of a SigV2 string-to-sign.
///
/// A path plus the sub-resources (`acl`, `versionId`, ...) the request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResource {
    path: String,
    sub_resources: Vec<(String, Option<String>)>,
}

impl CanonicalResource {
    /// Resource for an object in a path-style bucket: `/<bucket>/<key>`.
    ///
    /// A key that already starts with `/` is not given a second separator. The
    /// key is URI-encoded with `/` kept, so characters such as `?` or `=` stay
    /// part of the object name instead of starting a query.
    #[must_use]
    pub fn object(bucket: &str, key: &str) -> Self {
        let key = key.strip_prefix('/').unwrap_or(key);
        Self {
            path: format!("/{bucket}/{}", utf8_percent_encode(key, KEY_ENCODE_SET)),
            sub_resources: Vec::new(),
        }
    }

    /// Add a sub-resource. `None` renders as a bare key (`?acl`, never `?acl=`).
    #[must_use]
    pub fn with_sub_resource(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.sub_resources.push((key.into(), value));
        self
    }

    /// The resource path without sub-resources.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for CanonicalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;

        let mut sub: Vec<&(String, Option<String>)> = self.sub_resources.iter().collect();
        sub.sort_by(|a, b| a.0.cmp(&b.0));

        for (i, (k, v)) in sub.into_iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            match v {
                Some(val) if !val.is_empty() => write!(f, "{k}={val}")?,
                _ => f.write_str(k)?,
            }
        }
        Ok(())
    }
}

/// Build the SigV2 string to sign.
///
/// ```text
/// HTTP-Verb + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// CanonicalizedAmzHeaders +
/// CanonicalizedResource
/// ```
#[must_use]
pub fn string_to_sign(method: &Method, headers: &HeaderMap, resource: &CanonicalResource) -> String {
    let content_md5 = header_value(headers, "content-md5");
    let content_type = header_value(headers, "content-type");

    // When x-amz-date is present, the Date line is left empty.
    let date = if headers.contains_key("x-amz-date") {
        ""
    } else {
        header_value(headers, "date")
    };

    let amz_headers = build_canonicalized_amz_headers(headers);

    format!("{method}\n{content_md5}\n{content_type}\n{date}\n{amz_headers}{resource}")
}

/// Sign a request and insert its `Authorization` header.
///
/// `headers` must already carry `Date` (or `x-amz-date`); the signature is only
/// valid for a few minutes around that timestamp.
pub fn sign_request(
    signer: &dyn Signer,
    method: &Method,
    headers: &mut HeaderMap,
    resource: &CanonicalResource,
) -> Result<(), AuthError> {
    let string_to_sign = string_to_sign(method, headers, resource);
    trace!(string_to_sign = ?string_to_sign, "Built SigV2 string to sign");

    let authorization = signer.authorization(&string_to_sign)?;
    headers.insert(AUTHORIZATION, authorization);
    Ok(())
}

/// Format a timestamp as an RFC 1123 HTTP date (`Tue, 27 Mar 2007 19:36:42 GMT`).
#[must_use]
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the CanonicalizedAmzHeaders string.
///
/// All x-amz-* headers are lowercased, sorted, and joined with newlines.
/// Each header is formatted as `name:value\n`.
fn build_canonicalized_amz_headers(headers: &HeaderMap) -> String {
    let mut amz_headers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, value) in headers {
        let name_str = name.as_str();
        if name_str.starts_with("x-amz-") {
            let val = value.to_str().unwrap_or("").trim();
            amz_headers.entry(name_str).or_default().push(val);
        }
    }

    let mut result = String::new();
    for (name, values) in &amz_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }

    result
}

/// Compute the SigV2 signature: Base64(HMAC-SHA1(secret, string_to_sign)).
fn compute_sigv2_signature(secret_key: &str, string_to_sign: &str) -> Result<String, AuthError> {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).map_err(|_| AuthError::InvalidSecretKey)?;
    mac.update(string_to_sign.as_bytes());
    let result = mac.finalize().into_bytes();
    Ok(BASE64.encode(result))
}

/// Extract a header value as a string, returning empty string if missing.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
