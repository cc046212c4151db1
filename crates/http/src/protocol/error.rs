use std::io;
use thiserror::Error;

use crate::codec::LineKind;

/// Errors raised while decoding an HTTP/1.x byte stream.
///
/// Framing errors never escape [`MessageDecoder`](crate::codec::MessageDecoder); they are
/// wrapped into an in-band [`DecodeFailure`](crate::protocol::DecodeFailure) instead. The
/// chunk-body stage ([`ChunkedDecoder`](crate::codec::ChunkedDecoder)) returns them directly.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{} is larger than {max_size} bytes", .kind.label())]
    TooLongFrame { kind: LineKind, max_size: usize },

    #[error("invalid http method: {reason}")]
    InvalidMethod { reason: String },

    #[error("invalid http uri: {reason}")]
    InvalidUri { reason: String },

    #[error("invalid http version: {version:?}")]
    InvalidVersion { version: String },

    #[error("invalid http status: {reason}")]
    InvalidStatus { reason: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid chunk size: {reason}")]
    InvalidChunkSize { reason: String },

    #[error("invalid chunk: {reason}")]
    InvalidChunk { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl DecodeError {
    pub fn too_long_frame(kind: LineKind, max_size: usize) -> Self {
        Self::TooLongFrame { kind, max_size }
    }

    pub fn invalid_method<S: ToString>(str: S) -> Self {
        Self::InvalidMethod { reason: str.to_string() }
    }

    pub fn invalid_uri<S: ToString>(str: S) -> Self {
        Self::InvalidUri { reason: str.to_string() }
    }

    pub fn invalid_version<S: ToString>(str: S) -> Self {
        Self::InvalidVersion { version: str.to_string() }
    }

    pub fn invalid_status<S: ToString>(str: S) -> Self {
        Self::InvalidStatus { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(str: S) -> Self {
        Self::InvalidChunkSize { reason: str.to_string() }
    }

    pub fn invalid_chunk<S: ToString>(str: S) -> Self {
        Self::InvalidChunk { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if a start line or header block exceeded its configured bound
    pub fn is_too_long_frame(&self) -> bool {
        matches!(self, Self::TooLongFrame { .. })
    }

    /// Returns true if the start line could not be turned into a message head
    pub fn is_malformed_start_line(&self) -> bool {
        matches!(
            self,
            Self::InvalidMethod { .. } | Self::InvalidUri { .. } | Self::InvalidVersion { .. } | Self::InvalidStatus { .. }
        )
    }
}

/// Errors raised synchronously when building a [`DecoderConfig`](crate::codec::DecoderConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer: {value}")]
    NonPositive { name: &'static str, value: usize },
}

impl ConfigError {
    pub fn non_positive(name: &'static str, value: usize) -> Self {
        Self::NonPositive { name, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_frame_message_names_the_bound() {
        let line = DecodeError::too_long_frame(LineKind::StartLine, 4096);
        assert_eq!(line.to_string(), "HTTP line is larger than 4096 bytes");
        assert!(line.is_too_long_frame());

        let header = DecodeError::too_long_frame(LineKind::Header, 8192);
        assert_eq!(header.to_string(), "HTTP header is larger than 8192 bytes");
        assert!(!header.is_malformed_start_line());
    }

    #[test]
    fn config_error_message() {
        let error = ConfigError::non_positive("max_header_size", 0);
        assert_eq!(error.to_string(), "max_header_size must be a positive integer: 0");
    }
}
