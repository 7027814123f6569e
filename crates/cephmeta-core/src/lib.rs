//! Object metadata and ACL resolution against Ceph RGW.
//!
//! Given the URL of an object and a [`Bucket`] handle, [`fetch_from_url`]
//! resolves the object key, fetches the object and its ACL, and returns a
//! [`FileMeta`] carrying the live body stream, size, MIME type and collapsed
//! [`AccessLevel`].
//!
//! # Components
//!
//! - [`key`] - store-relative key extraction from a URL
//! - [`meta`] - object fetch, header validation and orchestration
//! - [`acl`] - signed `?acl` fetch and grant interpretation
//! - [`bucket`] - bucket handle wrapping endpoint, signer and transport
//! - [`transport`] - [`HttpTransport`] seam and its `reqwest` implementation
//! - [`body`] - [`ObjectBody`], the caller-owned response stream
//! - [`config`] - environment-driven [`SourceConfig`]
//!
//! # Example
//!
//! ```no_run
//! use cephmeta_core::{Bucket, SourceConfig, fetch_from_url};
//!
//! # async fn run() -> Result<(), cephmeta_core::CephMetaError> {
//! let bucket = Bucket::from_config(&SourceConfig::from_env())?;
//! let url: http::Uri = "https://store.example/bucket-a/dir/file.bin".parse().unwrap();
//!
//! let meta = fetch_from_url(&url, &bucket).await?;
//! println!("{} bytes of {} ({})", meta.filesize, meta.mimetype, meta.acl);
//! let data = meta.reader.bytes().await?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

pub mod acl;
pub mod body;
pub mod bucket;
pub mod config;
pub mod error;
pub mod key;
pub mod meta;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use acl::{
    GrantEvaluation, UnmappableGrant, access_level_from_grants, evaluate_grants, resolve_acl,
};
pub use body::ObjectBody;
pub use bucket::Bucket;
pub use cephmeta_model::AccessLevel;
pub use config::SourceConfig;
pub use error::{CephMetaError, CephMetaResult};
pub use key::resolve_key;
pub use meta::{FileMeta, fetch_file_meta, fetch_from_url};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
