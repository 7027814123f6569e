//! Scripted fakes for the signer and transport seams.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use cephmeta_auth::{AuthError, Signer};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri, Version};
use parking_lot::Mutex;

use crate::body::ObjectBody;
use crate::transport::{HttpTransport, TransportError};

/// Signer that records every string-to-sign and returns a fixed value.
#[derive(Debug, Default)]
pub(crate) struct FakeSigner {
    signed: Mutex<Vec<String>>,
}

impl FakeSigner {
    pub(crate) fn signed(&self) -> Vec<String> {
        self.signed.lock().clone()
    }
}

impl Signer for FakeSigner {
    fn authorization(&self, string_to_sign: &str) -> Result<HeaderValue, AuthError> {
        self.signed.lock().push(string_to_sign.to_owned());
        Ok(HeaderValue::from_static("AWS fake:signature"))
    }
}

/// Request head as seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
}

type Scripted = Result<Response<ObjectBody>, TransportError>;

/// Transport replaying queued responses in order and recording requests.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub(crate) fn push_response(
        &self,
        status: u16,
        headers: &[(&'static str, &'static str)],
        body: impl Into<Bytes>,
    ) {
        let mut response = Response::new(ObjectBody::from_bytes(body));
        *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::IM_A_TEAPOT);
        for (name, value) in headers {
            response
                .headers_mut()
                .append(*name, HeaderValue::from_static(value));
        }
        self.responses.lock().push_back(Ok(response));
    }

    pub(crate) fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(TransportError::Connection(message.to_owned())));
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: Request<()>) -> Result<Response<ObjectBody>, TransportError> {
        let (parts, ()) = request.into_parts();
        self.requests.lock().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".to_owned())))
    }
}
