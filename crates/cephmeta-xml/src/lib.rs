//! S3 XML deserialization for cephmeta.
//!
//! Only the documents cephmeta reads from the store are covered, chiefly the
//! `AccessControlPolicy` returned by `GET /<bucket>/<key>?acl`.
//!
//! # Key components
//!
//! - [`S3Deserialize`] trait and [`from_xml`] function for parsing XML response bodies into structs
//! - [`XmlError`] for malformed documents
//!
//! # S3 XML conventions
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/` (element names are matched
//!   without it)
//! - `<Grantee>` carries its kind in an `xsi:type` attribute

pub mod deserialize;
pub mod error;

pub use deserialize::{S3Deserialize, from_xml};
pub use error::XmlError;
