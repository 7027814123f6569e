//! Bucket handle.
//!
//! A [`Bucket`] bundles everything needed to address objects in one RGW
//! bucket: its name, the endpoint, a request [`Signer`] and an
//! [`HttpTransport`]. It holds no mutable state and is cheap to clone, so a
//! single handle can serve concurrent lookups.

use std::sync::Arc;

use cephmeta_auth::{
    CanonicalResource, Credentials, SigV2Signer, Signer, http_date, sign_request,
};
use chrono::{DateTime, Utc};
use http::header::{DATE, HOST};
use http::{HeaderMap, HeaderValue, Method, Request, Response};
use tracing::debug;

use crate::body::ObjectBody;
use crate::config::SourceConfig;
use crate::error::CephMetaResult;
use crate::transport::{HttpTransport, ReqwestTransport, TransportError};

/// Handle to a single path-style bucket on an RGW endpoint.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    scheme: String,
    host: String,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn HttpTransport>,
}

impl Bucket {
    /// Create a handle from its parts.
    ///
    /// `host` is the endpoint authority (`host[:port]`), used both in URLs and
    /// as the `Host` header.
    pub fn new(
        name: impl Into<String>,
        scheme: impl Into<String>,
        host: impl Into<String>,
        signer: Arc<dyn Signer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            scheme: scheme.into(),
            host: host.into(),
            signer,
            transport,
        }
    }

    /// Build a handle with SigV2 signing and a `reqwest` transport.
    pub fn from_config(config: &SourceConfig) -> CephMetaResult<Self> {
        config.validate()?;

        let signer = SigV2Signer::new(Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
        ));
        let transport = ReqwestTransport::new(config.request_timeout())?;

        Ok(Self::new(
            config.bucket.clone(),
            config.scheme.clone(),
            config.endpoint.clone(),
            Arc::new(signer),
            Arc::new(transport),
        ))
    }

    /// The bucket name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The endpoint authority (`host[:port]`).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request signer.
    #[must_use]
    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    /// Canonical resource of an object: `/<bucket>/<key>` without a doubled separator.
    #[must_use]
    pub fn object_resource(&self, key: &str) -> CanonicalResource {
        CanonicalResource::object(&self.name, key)
    }

    /// Absolute URL of an object.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}://{}{}",
            self.scheme,
            self.host,
            self.object_resource(key).path()
        )
    }

    /// `Host`, `Date` and `Authorization` headers for a request signed at `now`.
    ///
    /// The signature is only accepted within the store's clock-skew window, so
    /// callers pass the current time on every request.
    pub fn signed_headers(
        &self,
        method: &Method,
        resource: &CanonicalResource,
        now: DateTime<Utc>,
    ) -> CephMetaResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HOST,
            HeaderValue::from_str(&self.host).map_err(http::Error::from)?,
        );
        headers.insert(
            DATE,
            HeaderValue::from_str(&http_date(now)).map_err(http::Error::from)?,
        );
        sign_request(self.signer(), method, &mut headers, resource)?;
        Ok(headers)
    }

    /// Fetch an object with a signed `GET`, returning the response unread.
    pub async fn get_object(&self, key: &str) -> CephMetaResult<Response<ObjectBody>> {
        let resource = self.object_resource(key);
        let headers = self.signed_headers(&Method::GET, &resource, Utc::now())?;

        let mut request = Request::builder()
            .method(Method::GET)
            .uri(self.object_url(key))
            .body(())?;
        *request.headers_mut() = headers;

        debug!(bucket = %self.name, key = %key, "get_object");
        Ok(self.send_raw(request).await?)
    }

    /// Send a prepared request through the transport as-is.
    pub async fn send_raw(
        &self,
        request: Request<()>,
    ) -> Result<Response<ObjectBody>, TransportError> {
        self.transport.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSigner, FakeTransport};

    fn bucket(transport: Arc<FakeTransport>) -> Bucket {
        Bucket::new(
            "bucket-a",
            "https",
            "store.example",
            Arc::new(FakeSigner::default()),
            transport,
        )
    }

    #[test]
    fn test_should_build_object_url() {
        let bucket = bucket(Arc::new(FakeTransport::default()));
        assert_eq!(
            bucket.object_url("dir/file.bin"),
            "https://store.example/bucket-a/dir/file.bin"
        );
        assert_eq!(
            bucket.object_url("/dir/file.bin"),
            "https://store.example/bucket-a/dir/file.bin"
        );
        assert_eq!(
            bucket.object_url("file.bin?versionId=1"),
            "https://store.example/bucket-a/file.bin%3FversionId%3D1"
        );
    }

    #[test]
    fn test_should_build_from_config() {
        let config = SourceConfig::builder()
            .endpoint("store.example:7480".into())
            .bucket("bucket-a".into())
            .access_key("AKID".into())
            .secret_key("secret".into())
            .build();
        let bucket = Bucket::from_config(&config).expect("valid config");
        assert_eq!(bucket.name(), "bucket-a");
        assert_eq!(bucket.host(), "store.example:7480");
        assert_eq!(
            bucket.object_url("k"),
            "http://store.example:7480/bucket-a/k"
        );
    }

    #[test]
    fn test_should_reject_invalid_config() {
        let config = SourceConfig::default();
        assert!(Bucket::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_should_sign_get_object_request() {
        let transport = Arc::new(FakeTransport::default());
        transport.push_response(200, &[("content-length", "3")], "abc");
        let signer = Arc::new(FakeSigner::default());
        let bucket = Bucket::new(
            "bucket-a",
            "https",
            "store.example",
            signer.clone(),
            transport.clone(),
        );

        let response = bucket.get_object("dir/file.bin").await.expect("get_object");
        assert_eq!(response.status(), 200);
        response.into_body().close();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(
            sent[0].uri.to_string(),
            "https://store.example/bucket-a/dir/file.bin"
        );
        assert_eq!(sent[0].headers[HOST], "store.example");
        assert!(sent[0].headers.contains_key(DATE));
        assert_eq!(
            sent[0].headers[http::header::AUTHORIZATION],
            "AWS fake:signature"
        );

        let signed = signer.signed();
        assert_eq!(signed.len(), 1);
        assert!(signed[0].starts_with("GET\n\n\n"));
        assert!(signed[0].ends_with("\n/bucket-a/dir/file.bin"), "{}", signed[0]);
    }
}
