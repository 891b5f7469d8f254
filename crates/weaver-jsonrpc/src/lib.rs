//! JSON-RPC 2.0 message layer for language server traffic.
#![deny(missing_docs)]
//!
//! The crate models the four JSON-RPC message shapes, converts them to and
//! from [`serde_json::Value`], and layers typed reads and writes over any
//! [`JsonStream`] that can move whole JSON values. Framing stays with the
//! stream: [`FramedStream`] implements the LSP `Content-Length` framing for
//! hosts that talk to servers over stdio.
//!
//! ```
//! use std::io::Cursor;
//!
//! use serde_json::{Value, json};
//! use weaver_jsonrpc::{FramedStream, Request, transport};
//!
//! let mut outbound = FramedStream::new(Cursor::new(Vec::new()), Vec::new());
//! transport::write_request(&mut outbound, Request::new(1, "initialize", json!({})))?;
//!
//! let (_, bytes) = outbound.into_parts();
//! let mut inbound = FramedStream::new(Cursor::new(bytes), Vec::new());
//! let request = transport::read_request_as::<Value, _>(&mut inbound, 4096, "initialize")?;
//! assert_eq!(request.param, json!({}));
//! # Ok::<(), weaver_jsonrpc::WireError>(())
//! ```

pub mod codec;
mod config;
mod connection;
mod envelope;
mod error_code;
mod errors;
mod id;
mod message;
mod stream;
pub mod transport;

pub use config::{DEFAULT_MAX_MESSAGE_BYTES, WireConfig};
pub use connection::Connection;
pub use envelope::{Notification, Request, Response, ResponseError};
pub use error_code::ErrorCode;
pub use errors::{StreamError, WireError};
pub use id::{RequestId, RequestIdGenerator};
pub use message::{Batch, Message, MessageKind, Params};
pub use stream::{DEFAULT_MAX_DRAIN_BYTES, FramedStream, JsonStream};

#[cfg(test)]
mod tests;
