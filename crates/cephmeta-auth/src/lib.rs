//! AWS Signature Version 2 request signing for cephmeta.
//!
//! Ceph RGW still accepts the legacy SigV2 scheme, which is what the ACL fetch
//! uses: the request is signed by hand and sent outside the pooled object client.
//!
//! # Usage
//!
//! ```rust
//! use cephmeta_auth::{CanonicalResource, Credentials, SigV2Signer, sign_request};
//! use http::{HeaderMap, Method};
//!
//! let signer = SigV2Signer::new(Credentials::new("AKID", "secret"));
//! let resource = CanonicalResource::object("bucket", "dir/file.bin").with_sub_resource("acl", None);
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(http::header::DATE, "Tue, 27 Mar 2007 19:36:42 GMT".parse().unwrap());
//! sign_request(&signer, &Method::GET, &mut headers, &resource).unwrap();
//!
//! assert!(headers[http::header::AUTHORIZATION].to_str().unwrap().starts_with("AWS AKID:"));
//! ```
//!
//! # Modules
//!
//! - [`credentials`] - Access key / secret key pair
//! - [`error`] - Signing error types
//! - [`sigv2`] - String-to-sign construction and HMAC-SHA1 signing

pub mod credentials;
pub mod error;
pub mod sigv2;

pub use credentials::Credentials;
pub use error::AuthError;
pub use sigv2::{
    CanonicalResource, SigV2Signer, Signer, http_date, sign_request, string_to_sign,
};
