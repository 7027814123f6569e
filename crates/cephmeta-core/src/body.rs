//! Caller-owned object body stream.
//!
//! [`ObjectBody`] wraps the live HTTP response body of an object fetch. It is
//! handed to the caller unread; the underlying connection stays checked out
//! until the body is fully consumed, dropped, or [`ObjectBody::close`]d.

use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http_body::{Body, Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyDataStream, BodyExt, Empty, Full};

use crate::transport::TransportError;

/// Streaming response body whose release is the caller's responsibility.
#[must_use = "an ObjectBody holds an open connection; consume it or call close()"]
pub struct ObjectBody {
    inner: UnsyncBoxBody<Bytes, TransportError>,
}

impl ObjectBody {
    /// Wrap any `http_body::Body` producing `Bytes`.
    pub fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<TransportError>,
    {
        Self {
            inner: body.map_err(Into::into).boxed_unsync(),
        }
    }

    /// A fully buffered body.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            inner: Full::new(data.into())
                .map_err(|never: Infallible| match never {})
                .boxed_unsync(),
        }
    }

    /// A body with no content.
    pub fn empty() -> Self {
        Self {
            inner: Empty::<Bytes>::new()
                .map_err(|never: Infallible| match never {})
                .boxed_unsync(),
        }
    }

    /// Read the whole body into memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cephmeta_core::ObjectBody;
    ///
    /// # tokio_test::block_on(async {
    /// let body = ObjectBody::from_bytes("hello");
    /// assert_eq!(body.bytes().await.unwrap(), "hello");
    /// # });
    /// ```
    pub async fn bytes(self) -> Result<Bytes, TransportError> {
        Ok(self.inner.collect().await?.to_bytes())
    }

    /// Turn the body into a stream of data chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, TransportError>> + Send {
        BodyDataStream::new(self.inner)
    }

    /// Release the body without reading it, closing the underlying connection.
    pub fn close(self) {
        drop(self);
    }
}

impl Body for ObjectBody {
    type Data = Bytes;
    type Error = TransportError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Default for ObjectBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBody")
            .field("size_hint", &self.inner.size_hint().exact())
            .finish_non_exhaustive()
    }
}
