use std::fmt::Write;

use bytes::Bytes;
use http::HeaderMap;

use crate::protocol::DecodeError;

/// An object produced by the decoder.
///
/// A well-formed message decodes to one `Message`, zero or more `BodyChunk`s and a
/// terminal marker. The generic parameter `H` is the message head type
/// ([`RequestHeader`](crate::protocol::RequestHeader) or
/// [`ResponseHeader`](crate::protocol::ResponseHeader)).
#[derive(Debug)]
pub enum HttpObject<H> {
    /// The start line and header block of a message
    Message(H),
    /// Body bytes, passed through as they arrived
    BodyChunk(Bytes),
    /// End of the current message body
    TerminalMarker,
    /// End of a chunked body that carried trailing headers
    TerminalMarkerWithTrailers(HeaderMap),
    /// The stream could not be decoded; every following byte is discarded
    Failure(DecodeFailure<H>),
    /// Raw bytes received after a protocol switch
    Upgraded(Bytes),
}

impl<H> HttpObject<H> {
    /// Returns true if this object carries a message head
    #[inline]
    pub fn is_message(&self) -> bool {
        matches!(self, HttpObject::Message(_))
    }

    /// Returns true if this object carries body bytes
    #[inline]
    pub fn is_body_chunk(&self) -> bool {
        matches!(self, HttpObject::BodyChunk(_))
    }

    /// Returns true if this object ends a message, with or without trailers
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, HttpObject::TerminalMarker | HttpObject::TerminalMarkerWithTrailers(_))
    }

    /// Returns true if this object reports a decoding failure
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, HttpObject::Failure(_))
    }

    /// Consumes the object and returns the message head if this is a `Message`
    pub fn into_message(self) -> Option<H> {
        match self {
            HttpObject::Message(head) => Some(head),
            _ => None,
        }
    }

    /// Returns a reference to the payload if this is a `BodyChunk` or `Upgraded`
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            HttpObject::BodyChunk(bytes) | HttpObject::Upgraded(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Consumes the object and returns the failure if this is a `Failure`
    pub fn into_failure(self) -> Option<DecodeFailure<H>> {
        match self {
            HttpObject::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A decoding failure attached to the message it was raised for.
///
/// The head is the partially built message when the failure happened while reading
/// headers, or the role's placeholder head when no message existed yet.
#[derive(Debug)]
pub struct DecodeFailure<H> {
    head: H,
    error: DecodeError,
    raw: Option<Bytes>,
}

impl<H> DecodeFailure<H> {
    pub fn new(head: H, error: DecodeError, raw: Option<Bytes>) -> Self {
        Self { head, error, raw }
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    pub fn error(&self) -> &DecodeError {
        &self.error
    }

    /// The raw bytes that could not be decoded, when available
    pub fn raw(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }

    pub fn has_raw(&self) -> bool {
        self.raw.is_some()
    }

    pub fn into_parts(self) -> (H, DecodeError, Option<Bytes>) {
        (self.head, self.error, self.raw)
    }

    /// Renders the raw bytes as offset, hex and printable ASCII columns, 16 bytes per row.
    ///
    /// Returns an empty string when no raw bytes are attached.
    pub fn hex_dump(&self) -> String {
        let Some(raw) = &self.raw else {
            return String::new();
        };

        let mut dump = String::with_capacity(raw.len() * 4);
        for (row, chunk) in raw.chunks(16).enumerate() {
            let _ = write!(dump, "{:08x} ", row * 16);
            for i in 0..16 {
                match chunk.get(i) {
                    Some(b) => {
                        let _ = write!(dump, " {b:02x}");
                    }
                    None => dump.push_str("   "),
                }
            }
            dump.push_str("  |");
            dump.extend(chunk.iter().map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' }));
            dump.push_str("|\n");
        }
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LineKind;

    #[test]
    fn object_accessors() {
        let chunk = HttpObject::<()>::BodyChunk(Bytes::from_static(b"abc"));
        assert!(chunk.is_body_chunk());
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"abc"));
        assert!(chunk.into_message().is_none());

        assert!(HttpObject::<()>::TerminalMarker.is_terminal());
        assert!(HttpObject::<()>::TerminalMarkerWithTrailers(HeaderMap::new()).is_terminal());
        assert!(HttpObject::Message(()).is_message());
    }

    #[test]
    fn hex_dump() {
        let failure = DecodeFailure::new(
            (),
            DecodeError::invalid_method("bad"),
            Some(Bytes::from_static(b"G{T / HTTP/1.1\r\nHost: x")),
        );

        assert_eq!(
            failure.hex_dump(),
            "00000000  47 7b 54 20 2f 20 48 54 54 50 2f 31 2e 31 0d 0a  |G{T / HTTP/1.1..|\n\
             00000010  48 6f 73 74 3a 20 78                             |Host: x|\n"
        );
    }

    #[test]
    fn hex_dump_without_raw() {
        let failure = DecodeFailure::new((), DecodeError::too_long_frame(LineKind::Header, 8), None);
        assert!(!failure.has_raw());
        assert_eq!(failure.hex_dump(), "");
    }
}
