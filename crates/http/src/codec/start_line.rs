//! Start line tokenization and classification.
//!
//! The first line of a message is split on whitespace and classified by its shape only;
//! turning the tokens into typed values is left to the [`MessageHead`] implementation.
//! Lines with an unexpected number of tokens are not errors: the decoder drops them and
//! waits for the next candidate line.
//!
//! [`MessageHead`]: crate::protocol::MessageHead

use bytes::Bytes;
use http::Version;

use crate::ensure;
use crate::protocol::DecodeError;

/// A start line classified by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    /// A lone token starting with `HTTP`.
    VersionOnly { version: Bytes },
    /// `GET <target>` without a version, as sent by HTTP/0.9 clients.
    Simple { method: Bytes, target: Bytes },
    /// Three tokens: `method target version` for requests,
    /// `version status reason` for responses.
    Full { first: Bytes, second: Bytes, third: Bytes },
}

impl StartLine {
    /// Classifies `line`, returning `None` for shapes that are silently skipped.
    ///
    /// Status lines (`is_request == false`) keep everything after the status code as
    /// the reason phrase, which may be empty or contain spaces.
    pub fn parse(line: &Bytes, is_request: bool) -> Option<Self> {
        let tokens: Vec<&[u8]> = line.split(|b| b.is_ascii_whitespace()).filter(|token| !token.is_empty()).collect();

        if !is_request {
            if let [version, status, ..] = tokens[..] {
                if starts_with_http(version) {
                    let reason_start = status.as_ptr() as usize - line.as_ptr() as usize + status.len();
                    let reason = line.slice_ref(line[reason_start..].trim_ascii());
                    return Some(StartLine::Full {
                        first: line.slice_ref(version),
                        second: line.slice_ref(status),
                        third: reason,
                    });
                }
            }
        }

        match tokens[..] {
            [version] if starts_with_http(version) => Some(StartLine::VersionOnly { version: line.slice_ref(version) }),
            [method, target] if method.eq_ignore_ascii_case(b"GET") => {
                Some(StartLine::Simple { method: line.slice_ref(method), target: line.slice_ref(target) })
            }
            [first, second, third] => Some(StartLine::Full {
                first: line.slice_ref(first),
                second: line.slice_ref(second),
                third: line.slice_ref(third),
            }),
            _ => None,
        }
    }
}

fn starts_with_http(token: &[u8]) -> bool {
    token.len() >= 4 && token[..4].eq_ignore_ascii_case(b"HTTP")
}

/// Parses a protocol version token such as `HTTP/1.1`.
///
/// The protocol name is matched case-insensitively. `1.x` with a minor version above
/// zero is treated as HTTP/1.1; anything other than 0.9, 1.0 and 1.x is rejected.
pub(crate) fn parse_version(token: &[u8]) -> Result<Version, DecodeError> {
    let invalid = || DecodeError::invalid_version(String::from_utf8_lossy(token));

    let trimmed = token.trim_ascii();
    let Some(slash) = trimmed.iter().position(|b| *b == b'/') else {
        return Err(invalid());
    };
    let (protocol, number) = (&trimmed[..slash], &trimmed[slash + 1..]);
    ensure!(protocol.eq_ignore_ascii_case(b"HTTP"), invalid());

    let Some(dot) = number.iter().position(|b| *b == b'.') else {
        return Err(invalid());
    };
    let (major, minor) = (&number[..dot], &number[dot + 1..]);
    ensure!(is_digits(major) && is_digits(minor), invalid());

    match (major, minor) {
        (b"0", b"9") => Ok(Version::HTTP_09),
        (b"1", b"0") => Ok(Version::HTTP_10),
        (b"1", _) => Ok(Version::HTTP_11),
        _ => Err(invalid()),
    }
}

fn is_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}
