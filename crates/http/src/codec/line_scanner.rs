//! Bounded line scanning over a growing input buffer.
//!
//! A line ends at `LF`; a `CR` directly in front of the `LF` is part of the terminator.
//! When no terminator is buffered yet the scanner leaves the input untouched so the
//! next call sees the same bytes plus whatever arrived in between.

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::DecodeError;

/// Which bound a [`LineScanner`] enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The request or status line, bounded by `max_initial_line_length`.
    StartLine,
    /// Header and trailer lines, bounded by `max_header_size`.
    Header,
}

impl LineKind {
    /// Label used in size-limit errors.
    pub fn label(self) -> &'static str {
        match self {
            LineKind::StartLine => "HTTP line",
            LineKind::Header => "HTTP header",
        }
    }
}

/// Scans one line at a time while keeping a running byte count against a maximum.
///
/// The start-line configuration resets its count on every call; each call measures
/// every buffered byte of the pending line again, so the bound holds however the
/// line is fragmented. The header configuration keeps the count across lines until
/// [`reset`](Self::reset), bounding the header block as a whole. Bytes of a line that is
/// not complete yet are never committed to the count.
#[derive(Debug, Clone)]
pub(crate) struct LineScanner {
    kind: LineKind,
    max_length: usize,
    size: usize,
}

impl LineScanner {
    pub fn start_line(max_length: usize) -> Self {
        Self { kind: LineKind::StartLine, max_length, size: 0 }
    }

    pub fn header(max_length: usize) -> Self {
        Self { kind: LineKind::Header, max_length, size: 0 }
    }

    /// Splits the next complete line off `src`, without its terminator.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(line))` when a terminator was found; `src` is advanced past it
    /// - `Ok(None)` when more bytes are needed; `src` is left unchanged
    /// - `Err(DecodeError::TooLongFrame)` when the line exceeds the bound
    pub fn scan(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, DecodeError> {
        if self.kind == LineKind::StartLine {
            self.size = 0;
        }

        let budget = self.max_length.saturating_sub(self.size);

        let Some(lf) = memchr::memchr(b'\n', src) else {
            ensure!(content_len(src) <= budget, DecodeError::too_long_frame(self.kind, self.max_length));
            return Ok(None);
        };

        let len = content_len(&src[..lf]);
        ensure!(len <= budget, DecodeError::too_long_frame(self.kind, self.max_length));
        self.size += len;

        let mut line = src.split_to(lf + 1);
        line.truncate(len);
        trace!(kind = ?self.kind, len, "scanned line");
        Ok(Some(line.freeze()))
    }

    pub fn reset(&mut self) {
        self.size = 0;
    }
}

/// Length of `line` without a trailing `CR`.
fn content_len(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}
