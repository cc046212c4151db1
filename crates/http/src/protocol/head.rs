//! The message head abstraction populated by the decoder.

use http::HeaderMap;

use crate::codec::StartLine;
use crate::protocol::DecodeError;

/// A message head the decoder can build from a start line and fill with header fields.
///
/// Implemented by [`RequestHeader`](crate::protocol::RequestHeader) for request decoding
/// and [`ResponseHeader`](crate::protocol::ResponseHeader) for response decoding.
pub trait MessageHead: Clone {
    /// Whether this head belongs to a request.
    ///
    /// Affects status line tokenization and whether a connection closing before the
    /// body was delimited counts as premature.
    const IS_REQUEST: bool;

    /// Builds a head from a classified start line.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(head))` for a usable start line
    /// - `Ok(None)` for a shape this role cannot use; the line is skipped
    /// - `Err(_)` when a token cannot be parsed, e.g. an invalid method or version
    fn from_start_line(start_line: StartLine) -> Result<Option<Self>, DecodeError>;

    /// Placeholder head attached to failures raised before any head was built.
    fn invalid() -> Self;

    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Whether this message never carries a body regardless of its headers.
    fn is_content_always_empty(&self) -> bool {
        false
    }

    /// Whether the connection switches protocols once this message completes.
    fn is_upgrade(&self) -> bool {
        false
    }
}
