//! HTTP/1.x message decoder module
//!
//! This module decodes a stream of HTTP/1.x requests or responses incrementally. Input
//! may arrive in fragments of any size; the decoder suspends whenever a line is not
//! complete yet and resumes from the same bytes on the next call.
//!
//! # State machine
//!
//! ```text
//!  SkipControlChars -> ReadInitial -> ReadHeader -> ReadNext
//!         ^                |              |            |
//!         +----------------+              |         (reset)
//!         ^                               |            |
//!         +------ (content always empty) -+------------+--> Upgraded (101)
//!
//!  any parse failure -> BadMessage
//! ```
//!
//! Body bytes are handed out as they arrive. Callers that need chunked framing removed
//! feed them to a [`ChunkedDecoder`](crate::codec::ChunkedDecoder).
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_http_decoder::codec::RequestDecoder;
//! use micro_http_decoder::protocol::HttpObject;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut src = BytesMut::from("GET /index HTTP/1.1\r\nHost: x\r\n\r\n");
//! let mut out = Vec::new();
//!
//! decoder.decode_into(&mut src, &mut out);
//! decoder.finish_into(&mut src, &mut out);
//!
//! assert!(out[0].is_message());
//! assert!(matches!(out[1], HttpObject::TerminalMarker));
//! ```

use std::collections::VecDeque;
use std::mem;
use std::ops::ControlFlow;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::codec::header::{self, ContentLength, HeaderScratch, insert_field, read_header_block, remove_chunked};
use crate::codec::line_scanner::LineScanner;
use crate::codec::{DecoderConfig, StartLine};
use crate::protocol::{DecodeError, DecodeFailure, HttpObject, MessageHead, RequestHeader, ResponseHeader};

/// Decodes HTTP requests.
pub type RequestDecoder = MessageDecoder<RequestHeader>;

/// Decodes HTTP responses.
pub type ResponseDecoder = MessageDecoder<ResponseHeader>;

/// The observable state of a [`MessageDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeState {
    /// Skipping control characters and whitespace before a start line
    SkipControlChars,
    /// Reading the start line
    ReadInitial,
    /// Reading header lines of the pending message
    ReadHeader,
    /// Passing body bytes of the emitted message through
    ReadNext,
    /// Discarding every byte after a failure
    BadMessage,
    /// Forwarding bytes of a switched protocol
    Upgraded,
}

/// The decoder phase, owning the message while one is pending.
#[derive(Debug)]
enum Phase<H> {
    SkipControlChars,
    ReadInitial,
    ReadHeader(H),
    ReadNext(H),
    BadMessage,
    Upgraded,
}

impl<H> Phase<H> {
    fn state(&self) -> DecodeState {
        match self {
            Phase::SkipControlChars => DecodeState::SkipControlChars,
            Phase::ReadInitial => DecodeState::ReadInitial,
            Phase::ReadHeader(_) => DecodeState::ReadHeader,
            Phase::ReadNext(_) => DecodeState::ReadNext,
            Phase::BadMessage => DecodeState::BadMessage,
            Phase::Upgraded => DecodeState::Upgraded,
        }
    }

    fn pending(&self) -> Option<&H> {
        match self {
            Phase::ReadHeader(head) | Phase::ReadNext(head) => Some(head),
            _ => None,
        }
    }
}

/// An incremental HTTP/1.x decoder for either requests or responses.
///
/// Malformed input never produces an `Err`: size limit violations, malformed start
/// lines and rejected headers are reported in-band as [`HttpObject::Failure`], after
/// which the decoder discards all input until [`request_reset`](Self::request_reset).
///
/// Two equivalent entry points are provided:
/// - [`decode_into`](Self::decode_into) and [`finish_into`](Self::finish_into) push every
///   object produced by one call into a `Vec`
/// - the [`Decoder`] implementation hands the same objects out one per call, so the
///   decoder can drive a `FramedRead`
#[derive(Debug)]
pub struct MessageDecoder<H> {
    config: DecoderConfig,
    phase: Phase<H>,
    line_scanner: LineScanner,
    header_scanner: LineScanner,
    scratch: HeaderScratch,
    content_length: ContentLength,
    reset_requested: bool,
    outbox: VecDeque<HttpObject<H>>,
}

impl<H: MessageHead> MessageDecoder<H> {
    /// Creates a decoder with the default configuration
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            phase: Phase::SkipControlChars,
            line_scanner: LineScanner::start_line(config.max_initial_line_length()),
            header_scanner: LineScanner::header(config.max_header_size()),
            scratch: HeaderScratch::default(),
            content_length: ContentLength::default(),
            reset_requested: false,
            outbox: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn state(&self) -> DecodeState {
        self.phase.state()
    }

    /// The message whose headers or body are being read, if any.
    pub fn message(&self) -> Option<&H> {
        self.phase.pending()
    }

    /// Returns true if the pending message uses chunked transfer encoding.
    ///
    /// Always false when chunked support is disabled in the configuration.
    pub fn is_chunked(&self) -> bool {
        self.message().is_some_and(|head| self.is_chunked_message(head))
    }

    /// Asks the decoder to start over with a new message.
    ///
    /// The reset takes effect at the start of the next decoding call, so objects already
    /// produced are unaffected. This is how a caller leaves the body of a message, e.g.
    /// after rejecting a request carrying `Expect: 100-continue`, and how it recovers
    /// after a failure.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Decodes as much of `src` as possible, pushing every produced object to `out`.
    pub fn decode_into(&mut self, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) {
        loop {
            let before = (src.len(), out.len(), self.state());
            self.decode_once(src, out);

            if src.is_empty() || (src.len(), out.len(), self.state()) == before {
                return;
            }
        }
    }

    /// Decodes the remaining bytes of a stream that has ended, then completes or drops
    /// the pending message.
    ///
    /// A message whose body is being read gets its [`HttpObject::TerminalMarker`] unless
    /// the body is chunked. A message cut off in its headers, or with a chunked body, gets
    /// a marker only if it is a response without a positive `Content-Length`.
    pub fn finish_into(&mut self, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) {
        self.decode_into(src, out);

        let Some(head) = self.phase.pending() else {
            return;
        };

        let chunked = self.is_chunked_message(head);
        if matches!(self.phase, Phase::ReadNext(_)) && src.is_empty() && !chunked {
            debug!("stream ended after message body");
            self.reset_now();
            out.push(HttpObject::TerminalMarker);
            return;
        }

        let premature_closure =
            H::IS_REQUEST || chunked || self.content_length.resolve(head.headers()).is_some_and(|length| length > 0);
        let state = self.state();
        self.reset_now();

        if premature_closure {
            debug!(?state, chunked, "stream ended before message was complete");
        } else {
            out.push(HttpObject::TerminalMarker);
        }
    }

    fn is_chunked_message(&self, head: &H) -> bool {
        self.config.chunked_supported() && header::is_chunked(head.headers())
    }

    /// Runs the state machine until it suspends or hands out a message boundary.
    fn decode_once(&mut self, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) {
        if mem::take(&mut self.reset_requested) {
            self.reset_now();
        }

        while self.step(src, out).is_continue() {}
    }

    fn step(&mut self, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) -> ControlFlow<()> {
        match mem::replace(&mut self.phase, Phase::SkipControlChars) {
            Phase::SkipControlChars => {
                let skip = src.iter().position(|&b| !is_control_or_whitespace(b)).unwrap_or(src.len());
                src.advance(skip);

                if src.is_empty() {
                    return ControlFlow::Break(());
                }
                self.phase = Phase::ReadInitial;
                ControlFlow::Continue(())
            }

            Phase::ReadInitial => self.read_initial(src, out),

            Phase::ReadHeader(head) => self.read_header(head, src, out),

            Phase::ReadNext(head) => {
                if !src.is_empty() {
                    let bytes = src.split().freeze();
                    trace!(len = bytes.len(), "read body bytes");
                    out.push(HttpObject::BodyChunk(bytes));
                }
                self.phase = Phase::ReadNext(head);
                ControlFlow::Break(())
            }

            Phase::BadMessage => {
                if !src.is_empty() {
                    trace!(len = src.len(), "discarding bytes after failure");
                    src.clear();
                }
                self.phase = Phase::BadMessage;
                ControlFlow::Break(())
            }

            Phase::Upgraded => {
                if !src.is_empty() {
                    out.push(HttpObject::Upgraded(src.split().freeze()));
                }
                self.phase = Phase::Upgraded;
                ControlFlow::Break(())
            }
        }
    }

    fn read_initial(&mut self, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) -> ControlFlow<()> {
        let line = match self.line_scanner.scan(src) {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.phase = Phase::ReadInitial;
                return ControlFlow::Break(());
            }
            Err(e) => {
                self.fail(None, e, None, out);
                return ControlFlow::Continue(());
            }
        };

        let Some(start_line) = StartLine::parse(&line, H::IS_REQUEST) else {
            trace!(line = %String::from_utf8_lossy(&line), "skipping unrecognized start line");
            return ControlFlow::Continue(());
        };

        match H::from_start_line(start_line) {
            Ok(Some(head)) => {
                trace!("read start line");
                self.phase = Phase::ReadHeader(head);
            }
            Ok(None) => {
                trace!(line = %String::from_utf8_lossy(&line), "skipping start line");
            }
            Err(e) => self.fail(None, e, Some(line), out),
        }
        ControlFlow::Continue(())
    }

    fn read_header(&mut self, mut head: H, src: &mut BytesMut, out: &mut Vec<HttpObject<H>>) -> ControlFlow<()> {
        let validate = self.config.validate_headers();
        let headers = head.headers_mut();

        let result = read_header_block(&mut self.header_scanner, &mut self.scratch, src, |name, value| {
            insert_field(headers, &name, value, validate)
        });

        match result {
            Ok(true) => self.complete_head(head, out),
            Ok(false) => {
                self.phase = Phase::ReadHeader(head);
                ControlFlow::Break(())
            }
            Err(e) => {
                self.fail(Some(head), e, None, out);
                ControlFlow::Continue(())
            }
        }
    }

    fn complete_head(&mut self, mut head: H, out: &mut Vec<HttpObject<H>>) -> ControlFlow<()> {
        self.scratch.clear();

        if head.is_content_always_empty() {
            remove_chunked(head.headers_mut());
            let upgrade = head.is_upgrade();
            debug!(upgrade, "read message without content");

            out.push(HttpObject::Message(head));
            out.push(HttpObject::TerminalMarker);
            self.reset_to(upgrade);
            return ControlFlow::Break(());
        }

        debug!(chunked = self.is_chunked_message(&head), "read message head");
        out.push(HttpObject::Message(head.clone()));
        self.phase = Phase::ReadNext(head);
        ControlFlow::Break(())
    }

    fn fail(&mut self, head: Option<H>, error: DecodeError, raw: Option<Bytes>, out: &mut Vec<HttpObject<H>>) {
        warn!(cause = %error, "failed to decode http message");

        self.scratch.clear();
        self.phase = Phase::BadMessage;

        let head = head.unwrap_or_else(H::invalid);
        out.push(HttpObject::Failure(DecodeFailure::new(head, error, raw)));
    }

    fn reset_now(&mut self) {
        let phase = mem::replace(&mut self.phase, Phase::SkipControlChars);
        let upgrade = phase.pending().is_some_and(H::is_upgrade);
        self.reset_to(upgrade);
    }

    fn reset_to(&mut self, upgrade: bool) {
        self.scratch.clear();
        self.content_length = ContentLength::Unknown;
        self.line_scanner.reset();
        self.header_scanner.reset();

        if upgrade {
            debug!("switching to upgraded protocol");
            self.phase = Phase::Upgraded;
        } else {
            trace!("decoder reset");
            self.phase = Phase::SkipControlChars;
        }
    }
}

impl<H: MessageHead> Default for MessageDecoder<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace and ISO control characters, which may precede a start line.
fn is_control_or_whitespace(b: u8) -> bool {
    b <= b' ' || (0x7f..=0x9f).contains(&b)
}

impl<H: MessageHead> Decoder for MessageDecoder<H> {
    type Item = HttpObject<H>;
    type Error = DecodeError;

    /// Returns the next decoded object, decoding more of `src` once the previous batch
    /// has been handed out.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: the next message head, body chunk, marker, failure or upgraded payload
    /// - `Ok(None)`: need more data to proceed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.outbox.is_empty() {
            let mut out = Vec::new();
            self.decode_into(src, &mut out);
            self.outbox.extend(out);
        }

        Ok(self.outbox.pop_front())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.outbox.is_empty() {
            let mut out = Vec::new();
            self.finish_into(src, &mut out);
            self.outbox.extend(out);
        }

        Ok(self.outbox.pop_front())
    }
}
