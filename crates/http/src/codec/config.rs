//! Construction-time limits and switches for the decoders.

use crate::ensure;
use crate::protocol::ConfigError;

const DEFAULT_MAX_INITIAL_LINE_LENGTH: usize = 4096;
const DEFAULT_MAX_HEADER_SIZE: usize = 8192;
const DEFAULT_MAX_CHUNK_SIZE: usize = 8192;

/// Limits and switches shared by [`MessageDecoder`](crate::codec::MessageDecoder) and
/// [`ChunkedDecoder`](crate::codec::ChunkedDecoder).
///
/// The value is immutable once built; every limit is guaranteed to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    max_initial_line_length: usize,
    max_header_size: usize,
    max_chunk_size: usize,
    chunked_supported: bool,
    validate_headers: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_initial_line_length: DEFAULT_MAX_INITIAL_LINE_LENGTH,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            chunked_supported: true,
            validate_headers: true,
        }
    }
}

impl DecoderConfig {
    /// Creates a configuration with the given limits and both switches enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] if any limit is zero.
    pub fn new(max_initial_line_length: usize, max_header_size: usize, max_chunk_size: usize) -> Result<Self, ConfigError> {
        ensure!(
            max_initial_line_length > 0,
            ConfigError::non_positive("max_initial_line_length", max_initial_line_length)
        );
        ensure!(max_header_size > 0, ConfigError::non_positive("max_header_size", max_header_size));
        ensure!(max_chunk_size > 0, ConfigError::non_positive("max_chunk_size", max_chunk_size));

        Ok(Self { max_initial_line_length, max_header_size, max_chunk_size, ..Self::default() })
    }

    /// When disabled, `Transfer-Encoding: chunked` is never treated as chunked framing.
    #[must_use]
    pub fn with_chunked_supported(mut self, chunked_supported: bool) -> Self {
        self.chunked_supported = chunked_supported;
        self
    }

    /// When disabled, header fields with an invalid name or value are dropped instead of
    /// failing the message.
    #[must_use]
    pub fn with_validate_headers(mut self, validate_headers: bool) -> Self {
        self.validate_headers = validate_headers;
        self
    }

    pub fn max_initial_line_length(&self) -> usize {
        self.max_initial_line_length
    }

    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn chunked_supported(&self) -> bool {
        self.chunked_supported
    }

    pub fn validate_headers(&self) -> bool {
        self.validate_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.max_initial_line_length(), 4096);
        assert_eq!(config.max_header_size(), 8192);
        assert_eq!(config.max_chunk_size(), 8192);
        assert!(config.chunked_supported());
        assert!(config.validate_headers());
    }

    #[test]
    fn custom_limits() {
        let config = DecoderConfig::new(128, 256, 512).unwrap().with_chunked_supported(false).with_validate_headers(false);
        assert_eq!(config.max_initial_line_length(), 128);
        assert_eq!(config.max_header_size(), 256);
        assert_eq!(config.max_chunk_size(), 512);
        assert!(!config.chunked_supported());
        assert!(!config.validate_headers());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert_eq!(DecoderConfig::new(0, 1, 1), Err(ConfigError::non_positive("max_initial_line_length", 0)));
        assert_eq!(DecoderConfig::new(1, 0, 1), Err(ConfigError::non_positive("max_header_size", 0)));

        let err = DecoderConfig::new(1, 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "max_chunk_size must be a positive integer: 0");
    }
}
