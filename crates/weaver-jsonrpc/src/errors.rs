//! Error types surfaced by the JSON-RPC message layer.

use std::io;

use serde_json::Value;
use thiserror::Error;

use crate::message::MessageKind;

/// Errors returned by codec, envelope and transport operations.
///
/// Every variant is scoped to a single call: the stream stays usable after
/// any of them except where the [`StreamError`] itself says otherwise.
#[derive(Debug, Error)]
pub enum WireError {
    /// The underlying stream failed to produce or accept a JSON value.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// The JSON value matched none of the JSON-RPC 2.0 message shapes.
    #[error("message does not match any JSON-RPC 2.0 shape: {raw}")]
    Decode {
        /// Compact JSON text of the offending value.
        raw: String,
    },

    /// The message decoded, but is not the kind the caller asked for.
    #[error("expected a {expected} message but received a {found}")]
    UnexpectedMessageKind {
        /// Kind requested by the caller.
        expected: MessageKind,
        /// Kind actually received.
        found: MessageKind,
    },

    /// The method name differs from the caller's expectation.
    #[error("expected method '{expected}' but received '{found}'")]
    MethodMismatch {
        /// Method requested by the caller.
        expected: String,
        /// Method carried by the message.
        found: String,
    },

    /// The message carries no `params` but the caller requires them.
    #[error("method '{method}' was received without params")]
    MissingParams {
        /// Method carried by the message.
        method: String,
    },

    /// The `params` could not be decoded into the expected payload type.
    #[error("failed to decode params for method '{method}': {source}; params: {raw}")]
    ParamDecode {
        /// Method carried by the message.
        method: String,
        /// Compact JSON text of the params.
        raw: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// An integer outside the fixed error-code table.
    #[error("unknown JSON-RPC error code {code}")]
    UnknownErrorCode {
        /// The rejected integer.
        code: i64,
    },

    /// A request or notification payload serialised to a scalar.
    #[error("params for method '{method}' must serialise to a JSON object or array")]
    ScalarParams {
        /// Method of the rejected envelope.
        method: String,
    },

    /// A payload could not be serialised.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WireError {
    /// Builds a `Decode` error embedding the compact text of `value`.
    pub(crate) fn decode(value: &Value) -> Self {
        Self::Decode {
            raw: value.to_string(),
        }
    }

    /// Builds an `UnexpectedMessageKind` error.
    pub(crate) const fn unexpected_kind(expected: MessageKind, found: MessageKind) -> Self {
        Self::UnexpectedMessageKind { expected, found }
    }

    /// Builds a `MethodMismatch` error.
    pub(crate) fn method_mismatch(expected: &str, found: impl Into<String>) -> Self {
        Self::MethodMismatch {
            expected: expected.to_owned(),
            found: found.into(),
        }
    }

    /// Builds a `ParamDecode` error for the given params.
    pub(crate) fn param_decode(method: String, params: &Value, source: serde_json::Error) -> Self {
        Self::ParamDecode {
            method,
            raw: params.to_string(),
            source,
        }
    }
}

/// Failures of the byte stream beneath the message layer.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A header block ended without a `Content-Length` header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// A header line could not be parsed.
    #[error("invalid header format")]
    InvalidHeader,

    /// The announced body exceeds the caller's byte limit.
    #[error("message of {length} bytes exceeds the {limit} byte limit")]
    MessageTooLarge {
        /// Announced body length.
        length: usize,
        /// Limit supplied by the caller.
        limit: usize,
    },

    /// The announced body exceeds both the caller's limit and the stream's
    /// drain limit. The body is left unread, so the stream is out of step
    /// with its peer and should be closed.
    #[error("message of {length} bytes exceeds the {limit} byte drain limit")]
    FrameUnrecoverable {
        /// Announced body length.
        length: usize,
        /// Drain limit of the stream.
        limit: usize,
    },

    /// The body is not a single well-formed JSON value.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
}
