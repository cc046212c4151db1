//! HTTP request header handling implementation.
//!
//! This module wraps the standard `http::Request` type so the decoder can build a
//! request head from a start line and append header fields to it as they are parsed.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

use crate::codec::{StartLine, parse_version};
use crate::protocol::{DecodeError, MessageHead};

/// Represents an HTTP request header.
///
/// This struct wraps a `http::Request<()>` to provide:
/// - Access to standard HTTP header fields
/// - Construction from a decoded start line
/// - Body attachment capabilities
#[derive(Debug, Clone)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl AsMut<Request<()>> for RequestHeader {
    fn as_mut(&mut self) -> &mut Request<()> {
        &mut self.inner
    }
}

impl RequestHeader {
    fn new(method: Method, uri: Uri, version: Version) -> Self {
        let mut inner = Request::new(());
        *inner.method_mut() = method;
        *inner.uri_mut() = uri;
        *inner.version_mut() = version;
        Self { inner }
    }

    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches a body to this header, converting it into a full `Request<T>`.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|()| body)
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns a reference to the request's URI.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns a reference to the request's headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

impl MessageHead for RequestHeader {
    const IS_REQUEST: bool = true;

    /// A three token line is `method target version`; `GET target` becomes an HTTP/0.9
    /// request. A lone version token carries nothing a request can use and is skipped.
    fn from_start_line(start_line: StartLine) -> Result<Option<Self>, DecodeError> {
        match start_line {
            StartLine::VersionOnly { .. } => Ok(None),
            StartLine::Simple { target, .. } => Ok(Some(Self::new(Method::GET, parse_uri(target)?, Version::HTTP_09))),
            StartLine::Full { first, second, third } => {
                let method = Method::from_bytes(&first).map_err(DecodeError::invalid_method)?;
                let uri = parse_uri(second)?;
                let version = parse_version(&third)?;
                Ok(Some(Self::new(method, uri, version)))
            }
        }
    }

    fn invalid() -> Self {
        Self::new(Method::GET, Uri::from_static("/bad-request"), Version::HTTP_10)
    }

    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }
}

fn parse_uri(target: Bytes) -> Result<Uri, DecodeError> {
    Uri::from_maybe_shared(target).map_err(DecodeError::invalid_uri)
}

/// Converts request parts into a RequestHeader.
impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

/// Converts a bodyless request into a RequestHeader.
impl From<Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}
