//! Error types for object metadata resolution.
//!
//! Every variant is terminal: nothing in cephmeta retries. Callers that mirror
//! objects must treat [`CephMetaError::NotImplementedAclMapping`] as "cannot
//! determine the access level", never as "private".

use cephmeta_auth::AuthError;
use cephmeta_xml::XmlError;
use http::StatusCode;

use crate::transport::TransportError;

/// Core error type for cephmeta lookups.
#[derive(Debug, thiserror::Error)]
pub enum CephMetaError {
    /// The HTTP client failed on the object or the ACL request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The store answered the object or ACL request with something other than 200.
    #[error("url returned not 200: {status}")]
    NotSuccessHttpStatus {
        /// The status the store returned.
        status: StatusCode,
    },

    /// `content-length` was missing, unparsable or not positive.
    #[error("file has an invalid size")]
    FileInvalidSize,

    /// `content-type` was missing or empty.
    #[error("mime type not recognized")]
    MimeTypeNotRecognized,

    /// A grant uses semantics the access-level model cannot represent safely.
    #[error("acl mapping not implemented: grantee={grantee_uri:?} permission={permission:?}")]
    NotImplementedAclMapping {
        /// URI of the offending grantee.
        grantee_uri: String,
        /// Permission string of the offending grant.
        permission: String,
    },

    /// The ACL document could not be decoded.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The request could not be signed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request could not be built (for example an invalid URI).
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    /// The bucket name does not occur in the URL, so no key could be derived.
    #[error("no object key in {url} for bucket {bucket}")]
    EmptyObjectKey {
        /// The URL that was looked up.
        url: String,
        /// The bucket name that was searched for.
        bucket: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for cephmeta operations.
pub type CephMetaResult<T> = Result<T, CephMetaError>;
