//! An incremental HTTP/1.x message decoder
//!
//! This crate turns a byte stream into HTTP/1.x requests or responses without ever
//! blocking: bytes are fed as they arrive, in fragments of any size, and the decoder
//! suspends until a line is complete. It is meant to sit directly on top of a
//! connection, either driven by hand or plugged into a `tokio_util` `FramedRead`.
//!
//! # Features
//!
//! - Request and response decoding through one state machine
//! - Bounded start line and header block sizes
//! - Lenient start line handling: unrecognized lines are skipped, HTTP/0.9 `GET` accepted
//! - Folded header continuation lines
//! - In-band failure reporting with the raw offending bytes
//! - Protocol upgrade (101) pass-through
//! - Optional chunked body decoding with trailers
//! - Zero-copy: lines and body chunks are slices of the input buffer
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use micro_http_decoder::codec::RequestDecoder;
//! use micro_http_decoder::protocol::HttpObject;
//! use tokio::net::TcpListener;
//! use tokio_util::codec::FramedRead;
//! use tracing::{info, warn};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (stream, _remote_addr) = listener.accept().await?;
//!
//!         tokio::spawn(async move {
//!             let mut objects = FramedRead::new(stream, RequestDecoder::new());
//!             while let Some(object) = objects.next().await {
//!                 match object {
//!                     Ok(HttpObject::Message(head)) => {
//!                         info!(method = %head.method(), uri = %head.uri(), "receiving request");
//!                     }
//!                     Ok(HttpObject::BodyChunk(bytes)) => info!(len = bytes.len(), "receiving body"),
//!                     Ok(HttpObject::Failure(failure)) => {
//!                         warn!(cause = %failure.error(), "bad request\n{}", failure.hex_dump());
//!                         break;
//!                     }
//!                     Ok(_) => {}
//!                     Err(e) => {
//!                         warn!(cause = %e, "connection error");
//!                         break;
//!                     }
//!                 }
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - [`codec`]: the decoders and their configuration
//! - [`protocol`]: message heads, decoder output and error types
//!
//! # Core Components
//!
//! ## Decoding
//!
//! [`codec::MessageDecoder`] is the entry point, aliased as [`codec::RequestDecoder`] and
//! [`codec::ResponseDecoder`]. It produces, in stream order, a message head, the body bytes
//! as they arrive, and a terminal marker once the message is known to be complete.
//!
//! ## Body Framing
//!
//! Body bytes are passed through untouched. A caller that wants chunked framing removed
//! routes them through [`codec::ChunkedDecoder`], whose items convert into the same
//! [`protocol::HttpObject`] type.
//!
//! ## Error Handling
//!
//! Malformed input is reported in-band as [`protocol::HttpObject::Failure`], never as an
//! `Err`. The error types implement `std::error::Error`:
//!
//! - [`protocol::DecodeError`]: size limit, start line, header and chunk errors
//! - [`protocol::ConfigError`]: rejected configuration values
//!
//! # Limitations
//!
//! - HTTP/1.x only
//! - Content-Length does not delimit request bodies; see [`codec::MessageDecoder::request_reset`]

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
