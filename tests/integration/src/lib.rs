//! Integration tests for cephmeta against a live Ceph RGW.
//!
//! These tests require a running RGW (or any S3 endpoint that serves `?acl`)
//! at `CEPH_ENDPOINT_URL`, default `http://localhost:7480`. Objects are seeded
//! with `aws-sdk-s3` and then looked up through `cephmeta-core`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! CEPH_ACCESS_KEY=... CEPH_SECRET_KEY=... cargo test -p cephmeta-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use cephmeta_core::{Bucket, SourceConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL of the RGW under test.
fn endpoint_url() -> String {
    std::env::var("CEPH_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:7480".to_owned())
}

fn access_key() -> String {
    std::env::var("CEPH_ACCESS_KEY")
        .or_else(|_| std::env::var("AWS_ACCESS_KEY_ID"))
        .unwrap_or_else(|_| "test".to_owned())
}

fn secret_key() -> String {
    std::env::var("CEPH_SECRET_KEY")
        .or_else(|_| std::env::var("AWS_SECRET_ACCESS_KEY"))
        .unwrap_or_else(|_| "test".to_owned())
}

/// Create an S3 client for seeding objects, path-style against the RGW.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new(access_key(), secret_key(), None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Build a cephmeta bucket handle for `name` on the RGW under test.
#[must_use]
pub fn source_bucket(name: &str) -> Bucket {
    init_tracing();

    let endpoint: http::Uri = endpoint_url()
        .parse()
        .unwrap_or_else(|e| panic!("invalid CEPH_ENDPOINT_URL: {e}"));

    let config = SourceConfig::builder()
        .endpoint(
            endpoint
                .authority()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )
        .scheme(endpoint.scheme_str().unwrap_or("http").to_owned())
        .bucket(name.to_owned())
        .access_key(access_key())
        .secret_key(secret_key())
        .build();

    Bucket::from_config(&config).unwrap_or_else(|e| panic!("invalid source config: {e}"))
}

/// Public URL of an object, as a mirror would receive it.
#[must_use]
pub fn object_url(bucket: &str, key: &str) -> http::Uri {
    format!("{}/{bucket}/{key}", endpoint_url().trim_end_matches('/'))
        .parse()
        .unwrap_or_else(|e| panic!("invalid object url: {e}"))
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &aws_sdk_s3::Client, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    client
        .create_bucket()
        .bucket(&name)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// Upload an object with the given content type and optional canned ACL.
pub async fn put_test_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: &'static [u8],
    content_type: &str,
    acl: Option<ObjectCannedAcl>,
) {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from_static(body))
        .content_type(content_type)
        .set_acl(acl)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to put {bucket}/{key}: {e}"));
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return;
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

mod test_acl;
mod test_meta;
