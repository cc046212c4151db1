//! Trailer field decoding for chunked bodies.
//!
//! Trailers use the header line grammar, folding included, but fields that would change
//! message framing are parsed and dropped.

use bytes::BytesMut;
use http::HeaderMap;
use http::header::{CONTENT_LENGTH, TRAILER, TRANSFER_ENCODING};
use tracing::{debug, trace};

use super::header_decoder::{HeaderScratch, insert_field, read_header_block};
use crate::codec::line_scanner::LineScanner;
use crate::protocol::DecodeError;

/// Decodes the trailer block that follows the last chunk.
#[derive(Debug)]
pub(crate) struct TrailerDecoder {
    scanner: LineScanner,
    scratch: HeaderScratch,
    trailers: Option<HeaderMap>,
    validate: bool,
}

impl TrailerDecoder {
    pub fn new(max_header_size: usize, validate: bool) -> Self {
        Self { scanner: LineScanner::header(max_header_size), scratch: HeaderScratch::default(), trailers: None, validate }
    }

    /// Reads trailer lines until the closing empty line.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(None))` when the block was empty
    /// - `Ok(Some(Some(trailers)))` when at least one field was read; the set is empty if
    ///   every field was excluded
    /// - `Ok(None)` when more bytes are needed
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Option<HeaderMap>>, DecodeError> {
        let validate = self.validate;
        let trailers = &mut self.trailers;

        let complete = read_header_block(&mut self.scanner, &mut self.scratch, src, |name, value| {
            let trailers = trailers.get_or_insert_with(HeaderMap::new);
            if is_excluded(&name) {
                debug!(name = %String::from_utf8_lossy(&name), "dropping framing field from trailers");
                return Ok(());
            }
            insert_field(trailers, &name, value, validate)
        })?;

        if !complete {
            return Ok(None);
        }

        let trailers = self.trailers.take();
        trace!(fields = trailers.as_ref().map_or(0, HeaderMap::len), "decoded trailers");
        self.reset();
        Ok(Some(trailers))
    }

    pub fn reset(&mut self) {
        self.scanner.reset();
        self.scratch.clear();
        self.trailers = None;
    }
}

fn is_excluded(name: &[u8]) -> bool {
    [CONTENT_LENGTH, TRANSFER_ENCODING, TRAILER].iter().any(|excluded| name.eq_ignore_ascii_case(excluded.as_str().as_bytes()))
}
