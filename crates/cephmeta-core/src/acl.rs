//! ACL resolution.
//!
//! The object's ACL is fetched with a hand-signed `GET /<bucket>/<key>?acl`
//! sent outside the pooled client, then collapsed into an [`AccessLevel`].
//!
//! Grant interpretation is a pure fold over the grant list:
//!
//! - the level starts at [`AccessLevel::Private`];
//! - the first all-users grant decides: `READ` gives [`AccessLevel::PublicRead`],
//!   `WRITE` gives [`AccessLevel::PublicReadWrite`], any other permission keeps
//!   the object private; later all-users grants are ignored;
//! - authenticated-users and log-delivery grants, and `FULL_CONTROL` granted to
//!   any grantee URI, cannot be represented and fail the resolution.

use cephmeta_model::types::{
    ALL_USERS_URI, AUTHENTICATED_USERS_URI, AccessControlPolicy, Grant, LOG_DELIVERY_URI,
    Permission,
};
use cephmeta_model::AccessLevel;
use chrono::{DateTime, Utc};
use http::header::CONNECTION;
use http::{HeaderValue, Method, Request, StatusCode, Version};
use tracing::debug;

use crate::bucket::Bucket;
use crate::error::{CephMetaError, CephMetaResult};

/// A grant the access-level model has no safe mapping for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappableGrant {
    /// Grantee URI of the grant.
    pub grantee_uri: String,
    /// Permission string of the grant.
    pub permission: String,
}

impl From<UnmappableGrant> for CephMetaError {
    fn from(grant: UnmappableGrant) -> Self {
        CephMetaError::NotImplementedAclMapping {
            grantee_uri: grant.grantee_uri,
            permission: grant.permission,
        }
    }
}

/// Outcome of scanning a grant list.
///
/// `level` is only meaningful when `unmappable` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantEvaluation {
    /// Level derived from all-users grants.
    pub level: AccessLevel,
    /// First grant that cannot be mapped, if any.
    pub unmappable: Option<UnmappableGrant>,
}

impl GrantEvaluation {
    /// Convert into the level, or the mapping error when any grant was unmappable.
    pub fn into_result(self) -> CephMetaResult<AccessLevel> {
        match self.unmappable {
            Some(grant) => Err(grant.into()),
            None => Ok(self.level),
        }
    }
}

/// Scan every grant, tracking the public level and the first unmappable grant.
#[must_use]
pub fn evaluate_grants(grants: &[Grant]) -> GrantEvaluation {
    let mut level = AccessLevel::Private;
    let mut seen_all_users = false;
    let mut unmappable = None;

    for grant in grants {
        let uri = grant.grantee_uri();

        // Only the first all-users grant counts, whatever its permission.
        if uri == ALL_USERS_URI && !seen_all_users {
            seen_all_users = true;
            level = match grant.permission {
                Some(Permission::Read) => AccessLevel::PublicRead,
                Some(Permission::Write) => AccessLevel::PublicReadWrite,
                _ => AccessLevel::Private,
            };
        }

        let fails = uri == AUTHENTICATED_USERS_URI
            || uri == LOG_DELIVERY_URI
            || (grant.permission == Some(Permission::FullControl) && !uri.is_empty());

        if fails && unmappable.is_none() {
            unmappable = Some(UnmappableGrant {
                grantee_uri: uri.to_owned(),
                permission: grant.permission_str().to_owned(),
            });
        }
    }

    GrantEvaluation { level, unmappable }
}

/// Collapse a grant list into an access level.
///
/// # Examples
///
/// ```
/// use cephmeta_core::{AccessLevel, access_level_from_grants};
/// use cephmeta_model::{Grant, Grantee, Permission};
/// use cephmeta_model::types::ALL_USERS_URI;
///
/// let grants = vec![Grant {
///     grantee: Some(Grantee::group(ALL_USERS_URI)),
///     permission: Some(Permission::Read),
/// }];
/// assert_eq!(access_level_from_grants(&grants).unwrap(), AccessLevel::PublicRead);
/// assert_eq!(access_level_from_grants(&[]).unwrap(), AccessLevel::Private);
/// ```
pub fn access_level_from_grants(grants: &[Grant]) -> CephMetaResult<AccessLevel> {
    evaluate_grants(grants).into_result()
}

/// Build the signed, connection-closing `?acl` request for an object.
pub(crate) fn build_acl_request(
    bucket: &Bucket,
    key: &str,
    now: DateTime<Utc>,
) -> CephMetaResult<Request<()>> {
    let resource = bucket.object_resource(key).with_sub_resource("acl", None);

    let mut headers = bucket.signed_headers(&Method::GET, &resource, now)?;
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    let mut request = Request::builder()
        .method(Method::GET)
        .version(Version::HTTP_11)
        .uri(format!("{}?acl", bucket.object_url(key)))
        .body(())?;
    *request.headers_mut() = headers;

    Ok(request)
}

/// Fetch an object's ACL and collapse it into an [`AccessLevel`].
///
/// A fresh `Date` is stamped on every call; the request is sent with
/// `Connection: close` so no pooled connection is reused or kept.
pub async fn resolve_acl(bucket: &Bucket, key: &str) -> CephMetaResult<AccessLevel> {
    let request = build_acl_request(bucket, key, Utc::now())?;
    let response = bucket.send_raw(request).await?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!(bucket = %bucket.name(), key = %key, %status, "acl fetch returned non-200");
        return Err(CephMetaError::NotSuccessHttpStatus { status });
    }

    let body = response.into_body().bytes().await?;
    let policy: AccessControlPolicy = cephmeta_xml::from_xml(&body)?;

    let evaluation = evaluate_grants(&policy.grants);
    debug!(
        bucket = %bucket.name(),
        key = %key,
        grants = policy.grants.len(),
        level = %evaluation.level,
        unmappable = evaluation.unmappable.is_some(),
        "resolved acl"
    );
    evaluation.into_result()
}
