//! Header block decoding: field splitting, continuation folding and body framing lookups.
//!
//! Header lines are read one at a time through a [`LineScanner`]. A field is held in a
//! [`HeaderScratch`] until the next line shows whether it continues (a line starting with
//! a space or tab) or a new field begins, and only then appended to the header set.
//!
//! # Field splitting
//!
//! - the name starts at the first non-whitespace byte and ends at a colon or whitespace
//! - the value starts at the first non-whitespace byte after the colon
//! - trailing whitespace is trimmed from the value, which may be empty but never absent

use bytes::{BufMut, Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, Entry, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{trace, warn};

use crate::codec::line_scanner::LineScanner;
use crate::protocol::DecodeError;

/// A header field waiting for possible continuation lines.
#[derive(Debug, Default)]
pub(crate) struct HeaderScratch {
    name: Option<Bytes>,
    value: BytesMut,
}

impl HeaderScratch {
    /// Feeds one non-empty header line.
    ///
    /// Returns the previously pending field when `line` starts a new one.
    pub fn push_line(&mut self, line: &Bytes) -> Option<(Bytes, Bytes)> {
        if self.name.is_some() && matches!(line.first(), Some(b' ' | b'\t')) {
            self.value.put_u8(b' ');
            self.value.extend_from_slice(line.trim_ascii());
            return None;
        }

        let previous = self.take();
        let (name, value) = split_header(line);
        self.name = Some(name);
        self.value.extend_from_slice(&value);
        previous
    }

    /// Removes and returns the pending field, if any.
    pub fn take(&mut self) -> Option<(Bytes, Bytes)> {
        let name = self.name.take()?;
        Some((name, self.value.split().freeze()))
    }

    pub fn clear(&mut self) {
        self.name = None;
        self.value.clear();
    }
}

/// Splits a header line into name and value.
pub(crate) fn split_header(line: &Bytes) -> (Bytes, Bytes) {
    let len = line.len();

    let name_start = find_non_whitespace(line, 0);
    let name_end = line[name_start..].iter().position(|&b| b == b':' || b.is_ascii_whitespace()).map_or(len, |i| name_start + i);

    let colon_end = line[name_end..].iter().position(|&b| b == b':').map_or(len, |i| name_end + i + 1);

    let name = line.slice(name_start..name_end);
    let value_start = find_non_whitespace(line, colon_end);
    if value_start == len {
        return (name, Bytes::new());
    }

    let value_end = find_end_of_value(line);
    (name, line.slice(value_start..value_end))
}

fn find_non_whitespace(bytes: &[u8], offset: usize) -> usize {
    bytes[offset..].iter().position(|b| !b.is_ascii_whitespace()).map_or(bytes.len(), |i| offset + i)
}

fn find_end_of_value(bytes: &[u8]) -> usize {
    bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(0, |i| i + 1)
}

/// Reads header lines from `src` until the empty line closing the block.
///
/// Every completed field is handed to `on_field`, in order.
///
/// # Returns
///
/// - `Ok(true)` when the closing empty line was consumed and the last field flushed
/// - `Ok(false)` when more bytes are needed; fields seen so far stay pending or delivered
/// - `Err(_)` when the scanner bound is exceeded or `on_field` rejects a field
pub(crate) fn read_header_block<F>(
    scanner: &mut LineScanner,
    scratch: &mut HeaderScratch,
    src: &mut BytesMut,
    mut on_field: F,
) -> Result<bool, DecodeError>
where
    F: FnMut(Bytes, Bytes) -> Result<(), DecodeError>,
{
    loop {
        let Some(line) = scanner.scan(src)? else {
            return Ok(false);
        };

        if line.is_empty() {
            if let Some((name, value)) = scratch.take() {
                on_field(name, value)?;
            }
            return Ok(true);
        }

        if let Some((name, value)) = scratch.push_line(&line) {
            on_field(name, value)?;
        }
    }
}

/// Appends a field to `headers`.
///
/// With `validate`, a name that is not a token or a value with control bytes other than
/// horizontal tab is an error. Without it such fields are dropped.
pub(crate) fn insert_field(headers: &mut HeaderMap, name: &[u8], value: Bytes, validate: bool) -> Result<(), DecodeError> {
    let name = match HeaderName::from_bytes(name) {
        Ok(name) => name,
        Err(e) if validate => return Err(DecodeError::invalid_header(format!("{e}: {:?}", String::from_utf8_lossy(name)))),
        Err(e) => {
            warn!(cause = %e, "dropping header with invalid name");
            return Ok(());
        }
    };

    let value = match HeaderValue::from_maybe_shared(value) {
        Ok(value) => value,
        Err(e) if validate => return Err(DecodeError::invalid_header(format!("{e} for header {name}"))),
        Err(e) => {
            warn!(cause = %e, %name, "dropping header with invalid value");
            return Ok(());
        }
    };

    trace!(%name, "decoded header");
    headers.append(name, value);
    Ok(())
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 9112, chunked must be the final encoding if present.
pub fn is_chunked(headers: &HeaderMap) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    headers
        .get_all(TRANSFER_ENCODING)
        .iter()
        .last()
        .and_then(|value| value.as_bytes().rsplit(|b| *b == b',').next())
        .is_some_and(|coding| coding.trim_ascii().eq_ignore_ascii_case(CHUNKED))
}

/// Drops `chunked` from Transfer-Encoding, removing the header if no coding is left.
pub(crate) fn remove_chunked(headers: &mut HeaderMap) {
    let Entry::Occupied(entry) = headers.entry(TRANSFER_ENCODING) else {
        return;
    };

    let (_, values) = entry.remove_entry_mult();
    let codings: Vec<Vec<u8>> = values
        .flat_map(|value| {
            value
                .as_bytes()
                .split(|b| *b == b',')
                .map(<[u8]>::trim_ascii)
                .filter(|coding| !coding.is_empty() && !coding.eq_ignore_ascii_case(b"chunked"))
                .map(<[u8]>::to_vec)
                .collect::<Vec<_>>()
        })
        .collect();

    if codings.is_empty() {
        return;
    }

    if let Ok(value) = HeaderValue::from_bytes(&codings.join(&b", "[..])) {
        headers.insert(TRANSFER_ENCODING, value);
    }
}

/// Content-Length of the current message, parsed at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ContentLength {
    #[default]
    Unknown,
    Absent,
    Present(u64),
}

impl ContentLength {
    /// Returns the declared length, parsing `headers` on the first call only.
    ///
    /// A missing or non-numeric Content-Length is reported as absent.
    pub fn resolve(&mut self, headers: &HeaderMap) -> Option<u64> {
        if *self == ContentLength::Unknown {
            *self = headers
                .get(CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map_or(ContentLength::Absent, ContentLength::Present);
        }

        match *self {
            ContentLength::Present(length) => Some(length),
            ContentLength::Unknown | ContentLength::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn split(line: &'static str) -> (Bytes, Bytes) {
        split_header(&Bytes::from_static(line.as_bytes()))
    }

    fn decode_block(block: &str, validate: bool) -> Result<(bool, HeaderMap), DecodeError> {
        let mut scanner = LineScanner::header(8192);
        let mut scratch = HeaderScratch::default();
        let mut src = BytesMut::from(block);
        let mut headers = HeaderMap::new();
        let complete =
            read_header_block(&mut scanner, &mut scratch, &mut src, |name, value| insert_field(&mut headers, &name, value, validate))?;
        Ok((complete, headers))
    }

    #[test]
    fn split_rules() {
        assert_eq!(split("Host: example.com"), (Bytes::from_static(b"Host"), Bytes::from_static(b"example.com")));
        assert_eq!(split("  Accept :  */*  "), (Bytes::from_static(b"Accept"), Bytes::from_static(b"*/*")));
        assert_eq!(split("X-Empty:"), (Bytes::from_static(b"X-Empty"), Bytes::new()));
        assert_eq!(split("X-Blank:   \t"), (Bytes::from_static(b"X-Blank"), Bytes::new()));
        assert_eq!(split("X-Colon:a:b"), (Bytes::from_static(b"X-Colon"), Bytes::from_static(b"a:b")));
        assert_eq!(split("NoColon"), (Bytes::from_static(b"NoColon"), Bytes::new()));
    }

    #[test]
    fn scratch_folds_continuations() {
        let mut scratch = HeaderScratch::default();
        assert!(scratch.push_line(&Bytes::from_static(b"X-A: 1")).is_none());
        assert!(scratch.push_line(&Bytes::from_static(b"   more  ")).is_none());
        assert!(scratch.push_line(&Bytes::from_static(b"\tand more")).is_none());

        let previous = scratch.push_line(&Bytes::from_static(b"X-B: 2")).unwrap();
        assert_eq!(previous, (Bytes::from_static(b"X-A"), Bytes::from_static(b"1 more and more")));

        assert_eq!(scratch.take().unwrap(), (Bytes::from_static(b"X-B"), Bytes::from_static(b"2")));
        assert!(scratch.take().is_none());
    }

    #[test]
    fn leading_whitespace_without_pending_field_starts_a_field() {
        let mut scratch = HeaderScratch::default();
        assert!(scratch.push_line(&Bytes::from_static(b" X-A: 1")).is_none());
        assert_eq!(scratch.take().unwrap(), (Bytes::from_static(b"X-A"), Bytes::from_static(b"1")));
    }

    #[test]
    fn block_from_curl() {
        let block = indoc! {r##"
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let (complete, headers) = decode_block(block, true).unwrap();
        assert!(complete);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get(http::header::HOST).unwrap(), "127.0.0.1:8080");
        assert_eq!(headers.get(http::header::USER_AGENT).unwrap(), "curl/7.79.1");
        assert_eq!(headers.get(http::header::ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn incomplete_block() {
        let (complete, headers) = decode_block("Host: a\r\nAccept: b\r\n", true).unwrap();
        assert!(!complete);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn repeated_fields_are_kept() {
        let (_, headers) = decode_block("Set-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n", true).unwrap();
        let cookies: Vec<_> = headers.get_all(http::header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
    }

    #[test]
    fn validation() {
        let err = decode_block("Bad{Name: x\r\n\r\n", true).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHeader { .. }));

        let err = decode_block("X-Ctl: a\x01b\r\n\r\n", true).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHeader { .. }));

        let (complete, headers) = decode_block("X-Ctl: a\x01b\r\nX-Ok: 1\r\n\r\n", false).unwrap();
        assert!(complete);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-ok").unwrap(), "1");
    }

    #[test]
    fn check_is_chunked() {
        {
            let headers = HeaderMap::new();
            assert!(!is_chunked(&headers));
        }

        {
            let mut headers = HeaderMap::new();
            headers.insert("Transfer-Encoding", "gzip, chunked".parse().unwrap());
            assert!(is_chunked(&headers));
        }

        {
            let mut headers = HeaderMap::new();
            headers.insert("Transfer-Encoding", "chunked, gzip".parse().unwrap());
            assert!(!is_chunked(&headers));
        }

        {
            let mut headers = HeaderMap::new();
            headers.append("Transfer-Encoding", "gzip".parse().unwrap());
            headers.append("Transfer-Encoding", "Chunked".parse().unwrap());
            assert!(is_chunked(&headers));
        }
    }

    #[test]
    fn check_remove_chunked() {
        let mut headers = HeaderMap::new();
        headers.insert("Transfer-Encoding", "chunked".parse().unwrap());
        remove_chunked(&mut headers);
        assert!(!headers.contains_key(TRANSFER_ENCODING));

        let mut headers = HeaderMap::new();
        headers.append("Transfer-Encoding", "gzip, chunked".parse().unwrap());
        headers.append("Transfer-Encoding", "br".parse().unwrap());
        remove_chunked(&mut headers);
        assert_eq!(headers.get(TRANSFER_ENCODING).unwrap(), "gzip, br");
        assert!(!is_chunked(&headers));
    }

    #[test]
    fn content_length_is_resolved_once() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, "42".parse().unwrap());

        let mut content_length = ContentLength::default();
        assert_eq!(content_length.resolve(&headers), Some(42));

        headers.insert(CONTENT_LENGTH, "7".parse().unwrap());
        assert_eq!(content_length.resolve(&headers), Some(42));
        assert_eq!(content_length, ContentLength::Present(42));
    }

    #[test]
    fn content_length_absent_or_invalid() {
        let mut content_length = ContentLength::default();
        assert_eq!(content_length.resolve(&HeaderMap::new()), None);
        assert_eq!(content_length, ContentLength::Absent);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, "-1".parse().unwrap());
        let mut content_length = ContentLength::default();
        assert_eq!(content_length.resolve(&headers), None);
    }
}
