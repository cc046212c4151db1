//! Protocol types produced and populated by the decoder.
//!
//! # Components
//!
//! - **Message heads**: the containers the decoder fills in
//!   - [`MessageHead`]: the trait the decoder is generic over
//!   - [`RequestHeader`]: request head wrapping `http::Request<()>`
//!   - [`ResponseHeader`]: response head wrapping `http::Response<()>` and its reason phrase
//!
//! - **Decoder output**:
//!   - [`HttpObject`]: message heads, body chunks, terminal markers, failures and
//!     upgraded payload, in stream order
//!   - [`DecodeFailure`]: an error together with the message it belongs to and the
//!     offending raw bytes
//!
//! - **Errors**:
//!   - [`DecodeError`]: framing and parsing errors
//!   - [`ConfigError`]: rejected decoder configuration

mod head;
pub use head::MessageHead;

mod message;
pub use message::DecodeFailure;
pub use message::HttpObject;

mod request;
pub use request::RequestHeader;

mod response;
pub use response::ResponseHeader;

mod error;
pub use error::ConfigError;
pub use error::DecodeError;
