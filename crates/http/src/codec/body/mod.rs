//! HTTP body handling module
//!
//! The message decoder hands body bytes out exactly as they arrive. This module holds
//! the optional stage that removes chunked transfer encoding from those bytes.
//!
//! # Components
//!
//! - [`ChunkedDecoder`]: turns a chunked body into data pieces and trailers
//! - [`ChunkedItem`]: the items it produces
//! - [`parse_chunk_size`]: chunk size token parsing, extensions skipped

mod chunked_decoder;

pub use chunked_decoder::{ChunkedDecoder, ChunkedItem, parse_chunk_size};
