//! Source store configuration.
//!
//! Provides [`SourceConfig`], describing the RGW bucket objects are read from.
//! Values are loaded from environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CephMetaError, CephMetaResult};

/// Source bucket configuration.
///
/// # Examples
///
/// ```
/// use cephmeta_core::SourceConfig;
///
/// let config = SourceConfig::builder()
///     .endpoint("rgw.internal:7480".into())
///     .bucket("media".into())
///     .access_key("AKID".into())
///     .secret_key("secret".into())
///     .build();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.scheme, "http");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Store endpoint as `host[:port]`; also sent as the `Host` header.
    #[builder(default = String::from("localhost:7480"))]
    pub endpoint: String,

    /// URL scheme used to reach the endpoint (`http` or `https`).
    #[builder(default = String::from("http"))]
    pub scheme: String,

    /// Bucket the objects live in.
    #[builder(default)]
    pub bucket: String,

    /// Access key of the RGW user.
    #[builder(default)]
    pub access_key: String,

    /// Secret key of the RGW user.
    #[serde(skip_serializing, default)]
    #[builder(default)]
    pub secret_key: String,

    /// Connect/read timeout for store requests, in seconds. `0` disables it.
    #[builder(default = 30)]
    pub request_timeout_secs: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("localhost:7480"),
            scheme: String::from("http"),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            request_timeout_secs: 30,
            log_level: String::from("info"),
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CEPH_ENDPOINT` | `localhost:7480` |
    /// | `CEPH_SCHEME` | `http` |
    /// | `CEPH_BUCKET` | *(empty)* |
    /// | `CEPH_ACCESS_KEY` / `AWS_ACCESS_KEY_ID` | *(empty)* |
    /// | `CEPH_SECRET_KEY` / `AWS_SECRET_ACCESS_KEY` | *(empty)* |
    /// | `CEPH_REQUEST_TIMEOUT_SECS` | `30` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("CEPH_ENDPOINT") {
            config.endpoint = v;
        }
        if let Ok(v) = std::env::var("CEPH_SCHEME") {
            config.scheme = v.to_ascii_lowercase();
        }
        if let Ok(v) = std::env::var("CEPH_BUCKET") {
            config.bucket = v;
        }
        if let Ok(v) =
            std::env::var("CEPH_ACCESS_KEY").or_else(|_| std::env::var("AWS_ACCESS_KEY_ID"))
        {
            config.access_key = v;
        }
        if let Ok(v) =
            std::env::var("CEPH_SECRET_KEY").or_else(|_| std::env::var("AWS_SECRET_ACCESS_KEY"))
        {
            config.secret_key = v;
        }
        if let Ok(v) = std::env::var("CEPH_REQUEST_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.request_timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration can address a bucket.
    pub fn validate(&self) -> CephMetaResult<()> {
        if self.endpoint.is_empty() {
            return Err(CephMetaError::Config("endpoint must not be empty".to_owned()));
        }
        if self.bucket.is_empty() {
            return Err(CephMetaError::Config("bucket must not be empty".to_owned()));
        }
        if self.endpoint.contains('/') {
            return Err(CephMetaError::Config(format!(
                "endpoint must be host[:port], got {}",
                self.endpoint
            )));
        }
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(CephMetaError::Config(format!(
                "unsupported scheme: {}",
                self.scheme
            )));
        }
        Ok(())
    }

    /// The request timeout, or `None` when disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
