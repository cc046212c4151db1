//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module provides an optional stage that removes chunked framing from body bytes
//! as specified in [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! [`MessageDecoder`](crate::codec::MessageDecoder) passes body bytes through untouched;
//! callers that want the chunk payloads and trailers feed those bytes to a
//! [`ChunkedDecoder`] instead of consuming them directly.

use bytes::{Bytes, BytesMut};
use http::HeaderMap;
use tokio_util::codec::Decoder;
use tracing::trace;
use ChunkedState::*;

use crate::codec::DecoderConfig;
use crate::codec::header::TrailerDecoder;
use crate::codec::line_scanner::LineScanner;
use crate::ensure;
use crate::protocol::{DecodeError, HttpObject};

/// An item produced by [`ChunkedDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkedItem {
    /// Chunk payload, at most `max_chunk_size` bytes
    Data(Bytes),
    /// The body is complete, with trailers when the trailer block was not empty
    Last(Option<HeaderMap>),
}

impl ChunkedItem {
    pub fn is_data(&self) -> bool {
        matches!(self, ChunkedItem::Data(_))
    }

    pub fn is_last(&self) -> bool {
        matches!(self, ChunkedItem::Last(_))
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ChunkedItem::Data(bytes) => Some(bytes),
            ChunkedItem::Last(_) => None,
        }
    }
}

impl<H> From<ChunkedItem> for HttpObject<H> {
    fn from(item: ChunkedItem) -> Self {
        match item {
            ChunkedItem::Data(bytes) => HttpObject::BodyChunk(bytes),
            ChunkedItem::Last(None) => HttpObject::TerminalMarker,
            ChunkedItem::Last(Some(trailers)) => HttpObject::TerminalMarkerWithTrailers(trailers),
        }
    }
}

/// A decoder for handling HTTP chunked transfer encoding.
///
/// The decoder processes incoming bytes according to the chunked format:
/// - Each chunk starts with its size in hexadecimal, optionally followed by extensions
/// - Then the chunk data and an empty line
/// - A zero-sized chunk is followed by an optional trailer block
///
/// Once [`ChunkedItem::Last`] has been returned the decoder yields nothing until
/// [`reset`](Self::reset), leaving any following bytes in the buffer.
#[derive(Debug)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    max_chunk_size: usize,
    line_scanner: LineScanner,
    trailer_decoder: TrailerDecoder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size line
    Size,
    /// Read chunk data
    Data { remaining: u64 },
    /// Read the empty line after chunk data
    DataEnd,
    /// Read optional trailer fields
    Trailer,
    /// Final state after reading the trailer block
    End,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder instance.
    ///
    /// Size lines are bounded by `max_initial_line_length`, the trailer block by
    /// `max_header_size`.
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            state: Size,
            max_chunk_size: config.max_chunk_size(),
            line_scanner: LineScanner::start_line(config.max_initial_line_length()),
            trailer_decoder: TrailerDecoder::new(config.max_header_size(), config.validate_headers()),
        }
    }

    /// Returns true once the last chunk and its trailers have been decoded.
    pub fn is_finished(&self) -> bool {
        self.state == End
    }

    /// Prepares the decoder for the next chunked body.
    pub fn reset(&mut self) {
        self.state = Size;
        self.line_scanner.reset();
        self.trailer_decoder.reset();
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl Decoder for ChunkedDecoder {
    type Item = ChunkedItem;
    type Error = DecodeError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(ChunkedItem::Data(bytes)))` when chunk data is available
    /// - `Ok(Some(ChunkedItem::Last(trailers)))` when the trailer block is complete
    /// - `Ok(None)` when more data is needed, or the body is already finished
    /// - `Err(DecodeError)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                Size => {
                    let Some(line) = self.line_scanner.scan(src)? else {
                        return Ok(None);
                    };
                    let size = parse_chunk_size(&line)?;
                    trace!(size, "read chunk size");
                    self.state = if size == 0 { Trailer } else { Data { remaining: size } };
                }

                Data { remaining } => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let remaining_len = usize::try_from(remaining).unwrap_or(usize::MAX);
                    let read_size = src.len().min(remaining_len).min(self.max_chunk_size);
                    let bytes = src.split_to(read_size).freeze();

                    let remaining = remaining - read_size as u64;
                    self.state = if remaining == 0 { DataEnd } else { Data { remaining } };

                    trace!(len = bytes.len(), remaining, "read chunked bytes");
                    return Ok(Some(ChunkedItem::Data(bytes)));
                }

                DataEnd => {
                    let Some(line) = self.line_scanner.scan(src)? else {
                        return Ok(None);
                    };
                    ensure!(line.is_empty(), DecodeError::invalid_chunk("chunk data is not followed by CRLF"));
                    self.state = Size;
                }

                Trailer => {
                    let Some(trailers) = self.trailer_decoder.decode(src)? else {
                        return Ok(None);
                    };
                    trace!("finished reading chunked data");
                    self.state = End;
                    return Ok(Some(ChunkedItem::Last(trailers)));
                }

                End => return Ok(None),
            }
        }
    }
}

/// Parses the size token of a chunk size line.
///
/// Surrounding whitespace is ignored and the token ends at the first `;`, whitespace or
/// control byte, so chunk extensions are skipped. The token must be a non-empty
/// hexadecimal number that fits in a `u64`.
pub fn parse_chunk_size(line: &[u8]) -> Result<u64, DecodeError> {
    macro_rules! or_overflow {
        ($e:expr) => {
            match $e {
                Some(val) => val,
                None => return Err(DecodeError::invalid_chunk_size("invalid overflow chunked length")),
            }
        };
    }

    let line = line.trim_ascii();
    let end = line.iter().position(|&b| b == b';' || b.is_ascii_whitespace() || b.is_ascii_control()).unwrap_or(line.len());
    let token = &line[..end];
    ensure!(!token.is_empty(), DecodeError::invalid_chunk_size("missing chunk size"));

    let radix = 16;
    let mut size: u64 = 0;
    for &b in token {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b + 10 - b'a',
            b'A'..=b'F' => b + 10 - b'A',
            _ => return Err(DecodeError::invalid_chunk_size(format!("{:?}", String::from_utf8_lossy(token)))),
        };
        size = or_overflow!(size.checked_mul(radix));
        size = or_overflow!(size.checked_add(u64::from(digit)));
    }

    Ok(size)
}
