//! Untyped JSON-RPC 2.0 message model.

use std::fmt;

use serde_json::{Map, Value};

use crate::error_code::ErrorCode;
use crate::id::RequestId;

/// Structured request or notification parameters.
///
/// JSON-RPC only permits an object or an array here, never a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Named parameters.
    Object(Map<String, Value>),
    /// Positional parameters.
    Array(Vec<Value>),
}

impl Params {
    /// Wraps a JSON value, returning `None` for scalars and `null`.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Object(map)),
            Value::Array(items) => Some(Self::Array(items)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        }
    }

    /// Converts the params back into a JSON value.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map),
            Self::Array(items) => Value::Array(items),
        }
    }

    /// Returns a JSON copy of the params.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.clone().into_json()
    }
}

/// The four message shapes, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A method call expecting a response.
    Request,
    /// A method call without a response.
    Notification,
    /// A successful response.
    Response,
    /// An error response.
    ResponseError,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Request => "request",
            Self::Notification => "notification",
            Self::Response => "response",
            Self::ResponseError => "response error",
        };
        formatter.write_str(label)
    }
}

/// A JSON-RPC 2.0 message.
///
/// The `"jsonrpc":"2.0"` tag is implied and added by [`crate::codec::encode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A method call expecting a response.
    Request {
        /// Correlation identifier.
        id: RequestId,
        /// Method name.
        method: String,
        /// Optional parameters.
        params: Option<Params>,
    },
    /// A method call without a response.
    Notification {
        /// Method name.
        method: String,
        /// Optional parameters.
        params: Option<Params>,
    },
    /// A successful response.
    Response {
        /// Identifier of the answered request.
        id: RequestId,
        /// Result value, possibly `null`.
        result: Value,
    },
    /// An error response.
    ResponseError {
        /// Identifier of the answered request.
        id: RequestId,
        /// Error code.
        code: ErrorCode,
        /// Human-readable description.
        message: String,
        /// Optional additional data.
        data: Option<Value>,
    },
}

/// Ordered sequence of messages sent as one JSON array.
pub type Batch = Vec<Message>;

impl Message {
    /// Returns the shape of this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Request { .. } => MessageKind::Request,
            Self::Notification { .. } => MessageKind::Notification,
            Self::Response { .. } => MessageKind::Response,
            Self::ResponseError { .. } => MessageKind::ResponseError,
        }
    }

    /// Returns the method name for requests and notifications.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request { method, .. } | Self::Notification { method, .. } => Some(method),
            Self::Response { .. } | Self::ResponseError { .. } => None,
        }
    }

    /// Returns the identifier for every shape except notifications.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request { id, .. } | Self::Response { id, .. } | Self::ResponseError { id, .. } => {
                Some(id)
            }
            Self::Notification { .. } => None,
        }
    }
}
