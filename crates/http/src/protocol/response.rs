//! HTTP response header handling implementation.
//!
//! Response decoding mirrors request decoding: the decoder builds a [`ResponseHeader`]
//! from the status line and appends header fields as they are parsed. The reason phrase
//! is kept alongside the `http::Response<()>` since `http` has no slot for it.

use bytes::Bytes;
use http::header::SEC_WEBSOCKET_ACCEPT;
use http::{HeaderMap, Response, StatusCode, Version};

use crate::codec::{StartLine, parse_version};
use crate::protocol::{DecodeError, MessageHead};

/// Represents an HTTP response header together with its reason phrase.
#[derive(Debug, Clone)]
pub struct ResponseHeader {
    inner: Response<()>,
    reason: Bytes,
}

impl ResponseHeader {
    fn new(version: Version, status: StatusCode, reason: Bytes) -> Self {
        let mut inner = Response::new(());
        *inner.version_mut() = version;
        *inner.status_mut() = status;
        Self { inner, reason }
    }

    /// Consumes the header and returns the inner `Response<()>`.
    pub fn into_inner(self) -> Response<()> {
        self.inner
    }

    /// Attaches a body to this header, converting it into a full `Response<T>`.
    pub fn body<T>(self, body: T) -> Response<T> {
        self.inner.map(|()| body)
    }

    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// The reason phrase as sent, possibly empty.
    pub fn reason(&self) -> &[u8] {
        &self.reason
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

impl MessageHead for ResponseHeader {
    const IS_REQUEST: bool = false;

    fn from_start_line(start_line: StartLine) -> Result<Option<Self>, DecodeError> {
        match start_line {
            StartLine::Full { first, second, third } => {
                let version = parse_version(&first)?;
                let status = StatusCode::from_bytes(&second).map_err(DecodeError::invalid_status)?;
                Ok(Some(Self::new(version, status, third)))
            }
            StartLine::VersionOnly { .. } | StartLine::Simple { .. } => Ok(None),
        }
    }

    fn invalid() -> Self {
        // 999 is the highest code `StatusCode` accepts and is not assigned by any registry
        let status = StatusCode::from_u16(999).unwrap_or(StatusCode::BAD_REQUEST);
        Self::new(Version::HTTP_10, status, Bytes::from_static(b"Unknown"))
    }

    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// 1xx, 204, 205 and 304 responses never carry a body.
    ///
    /// A 101 without `Sec-WebSocket-Accept` is the Hixie-76 WebSocket handshake, whose
    /// response carries a body, so it is read like any other message.
    fn is_content_always_empty(&self) -> bool {
        let code = self.status().as_u16();
        if (100..200).contains(&code) {
            return !(code == 101 && !self.headers().contains_key(SEC_WEBSOCKET_ACCEPT));
        }

        matches!(code, 204 | 205 | 304)
    }

    fn is_upgrade(&self) -> bool {
        self.status() == StatusCode::SWITCHING_PROTOCOLS
    }
}
