//! HTTP header block decoding
//!
//! This module turns header lines into fields of an `http::HeaderMap`. It is shared by
//! the message decoder, which reads the header block after the start line, and the
//! chunked body stage, which reads the trailer block after the last chunk.
//!
//! # Components
//!
//! - [`HeaderScratch`]: holds one field until its continuation lines are folded in
//! - [`read_header_block`]: drives a line scanner up to the empty line ending the block
//! - [`TrailerDecoder`]: trailer block decoding with framing fields excluded
//! - [`is_chunked`], [`ContentLength`]: body framing lookups on a decoded head

mod header_decoder;
mod trailer_decoder;

pub(crate) use header_decoder::{ContentLength, HeaderScratch, insert_field, read_header_block, remove_chunked};
pub use header_decoder::is_chunked;
pub(crate) use trailer_decoder::TrailerDecoder;
