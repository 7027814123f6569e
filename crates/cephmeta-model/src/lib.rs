//! Data types shared across cephmeta crates.
//!
//! - [`types`] mirrors the S3 `AccessControlPolicy` document returned by `GET ?acl`.
//! - [`access`] holds [`AccessLevel`], the collapsed visibility model callers consume.

pub mod access;
pub mod types;

pub use access::AccessLevel;
pub use types::{AccessControlPolicy, Grant, Grantee, GranteeType, Owner, Permission};
