//! HTTP codec module for decoding HTTP/1.x messages
//!
//! This module provides streaming decoding of HTTP/1.x requests and responses. Bytes are
//! consumed as they arrive and turned into [`HttpObject`](crate::protocol::HttpObject)s
//! by a state machine that suspends whenever a line is incomplete.
//!
//! # Architecture
//!
//! The codec module is organized into several components:
//!
//! - Message decoding:
//!   - [`MessageDecoder`]: the state machine, aliased as [`RequestDecoder`] and [`ResponseDecoder`]
//!   - [`StartLine`]: tokenizes and classifies the first line of a message
//!   - bounded line scanning, with limits labelled by [`LineKind`]
//!   - header block decoding with continuation folding
//!
//! - Body decoding:
//!   - [`ChunkedDecoder`]: optional stage removing chunked framing from body bytes
//!
//! - Configuration:
//!   - [`DecoderConfig`]: size limits and switches, validated on construction
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_http_decoder::codec::{DecoderConfig, ResponseDecoder};
//! use tokio_util::codec::Decoder;
//!
//! let config = DecoderConfig::new(4096, 8192, 8192).unwrap();
//! let mut decoder = ResponseDecoder::with_config(config);
//! let mut buffer = BytesMut::from("HTTP/1.1 204 No Content\r\n\r\n");
//!
//! let head = decoder.decode(&mut buffer).unwrap().unwrap().into_message().unwrap();
//! assert_eq!(head.status(), 204);
//! assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_terminal());
//! ```

mod body;
mod config;
mod header;
pub(crate) mod line_scanner;
mod message_decoder;
mod start_line;

pub use body::{ChunkedDecoder, ChunkedItem, parse_chunk_size};
pub use config::DecoderConfig;
pub use header::is_chunked;
pub use line_scanner::LineKind;
pub use message_decoder::{DecodeState, MessageDecoder, RequestDecoder, ResponseDecoder};
pub(crate) use start_line::parse_version;
pub use start_line::StartLine;
