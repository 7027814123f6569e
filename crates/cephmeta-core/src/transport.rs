//! HTTP transport seam.
//!
//! The core never talks to a socket directly: every request goes through an
//! [`HttpTransport`]. [`ReqwestTransport`] is the production implementation;
//! tests substitute a scripted fake.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use http::header::CONNECTION;
use http::{HeaderMap, Request, Response};
use tracing::trace;

use crate::body::ObjectBody;

/// Errors raised by an [`HttpTransport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Error reported by the `reqwest` client.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Connection-level failure reported by a non-`reqwest` transport.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Issues a single HTTP request and returns the response with an unread body.
///
/// Requests carrying `Connection: close` must not be served from, or returned
/// to, a connection pool.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Send `request` and return the response head plus its live body.
    async fn send(&self, request: Request<()>) -> Result<Response<ObjectBody>, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// Keeps two clients: a pooled one for regular requests and one with idle
/// pooling disabled for one-off `Connection: close` exchanges.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    pooled: reqwest::Client,
    oneshot: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport. `timeout` bounds connecting and each body read; it
    /// does not cap the total time spent streaming a large object.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut pooled = reqwest::Client::builder();
        let mut oneshot = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .http1_only();

        if let Some(timeout) = timeout {
            pooled = pooled.connect_timeout(timeout).read_timeout(timeout);
            oneshot = oneshot.connect_timeout(timeout).read_timeout(timeout);
        }

        Ok(Self {
            pooled: pooled.build()?,
            oneshot: oneshot.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: Request<()>) -> Result<Response<ObjectBody>, TransportError> {
        let (parts, ()) = request.into_parts();

        let client = if wants_close(&parts.headers) {
            &self.oneshot
        } else {
            &self.pooled
        };

        trace!(method = %parts.method, uri = %parts.uri, "sending request");

        let response = client
            .request(parts.method, parts.uri.to_string())
            .version(parts.version)
            .headers(parts.headers)
            .send()
            .await?;

        let response: Response<reqwest::Body> = response.into();
        Ok(response.map(ObjectBody::new))
    }
}

/// Whether the request asks for the connection to be closed after the exchange.
pub(crate) fn wants_close(headers: &HeaderMap) -> bool {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("close"))
}
