//! cephmeta - look up object metadata and access level on Ceph RGW.
//!
//! Each argument is an object URL. For every URL the object is fetched with a
//! signed request, its size, MIME type and ACL are checked, and one JSON line
//! is printed. Object bodies are released unread.
//!
//! # Usage
//!
//! ```text
//! CEPH_BUCKET=media cephmeta https://rgw.internal/media/2024/cat.png
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CEPH_ENDPOINT` | `localhost:7480` | RGW endpoint (`host[:port]`) |
//! | `CEPH_SCHEME` | `http` | `http` or `https` |
//! | `CEPH_BUCKET` | *(required)* | Bucket the URLs point into |
//! | `CEPH_ACCESS_KEY` | *(empty)* | Access key, falls back to `AWS_ACCESS_KEY_ID` |
//! | `CEPH_SECRET_KEY` | *(empty)* | Secret key, falls back to `AWS_SECRET_ACCESS_KEY` |
//! | `CEPH_REQUEST_TIMEOUT_SECS` | `30` | Connect/read timeout, `0` disables |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! The process exits non-zero when any lookup fails.

use anyhow::{Context, Result, bail};
use cephmeta_core::{
    AccessLevel, Bucket, CephMetaError, CephMetaResult, FileMeta, SourceConfig,
};
use http::Uri;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filesize: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acl: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Report {
    fn failed(url: &str, key: Option<String>, error: impl ToString) -> Self {
        Self {
            url: url.to_owned(),
            key,
            filesize: None,
            mimetype: None,
            acl: None,
            error: Some(error.to_string()),
        }
    }

    /// Build a report from a lookup result, releasing the body unread.
    fn from_result(url: &str, key: String, result: CephMetaResult<FileMeta>) -> Self {
        match result {
            Ok(FileMeta {
                reader,
                filesize,
                mimetype,
                acl,
            }) => {
                reader.close();
                Self {
                    url: url.to_owned(),
                    key: Some(key),
                    filesize: Some(filesize),
                    mimetype: Some(mimetype),
                    acl: Some(acl),
                    error: None,
                }
            }
            Err(e) => Self::failed(url, Some(key).filter(|k| !k.is_empty()), e),
        }
    }

    fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

async fn lookup(bucket: &Bucket, raw: &str) -> Report {
    let url: Uri = match raw.parse() {
        Ok(url) => url,
        Err(e) => return Report::failed(raw, None, format!("invalid url: {e}")),
    };

    let key = cephmeta_core::resolve_key(&url, bucket.name());
    let result = if key.is_empty() {
        Err(CephMetaError::EmptyObjectKey {
            url: url.to_string(),
            bucket: bucket.name().to_owned(),
        })
    } else {
        cephmeta_core::fetch_file_meta(bucket, &key).await
    };
    Report::from_result(raw, key, result)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SourceConfig::from_env();
    init_tracing(&config.log_level)?;

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: cephmeta <url>...");
    }

    info!(
        endpoint = %config.endpoint,
        scheme = %config.scheme,
        bucket = %config.bucket,
        urls = urls.len(),
        "looking up objects"
    );

    let bucket = Bucket::from_config(&config).context("invalid source configuration")?;

    let mut failures = 0usize;
    for raw in &urls {
        let report = lookup(&bucket, raw).await;
        if report.is_failure() {
            failures += 1;
            warn!(
                url = %raw,
                error = report.error.as_deref().unwrap_or_default(),
                "lookup failed"
            );
        }
        println!(
            "{}",
            serde_json::to_string(&report).context("failed to encode report")?
        );
    }

    if failures > 0 {
        bail!("{failures} of {} lookups failed", urls.len());
    }

    Ok(())
}
