//! Fixed JSON-RPC and LSP error codes.

use std::fmt;

use crate::errors::WireError;

/// Error codes understood by the message layer.
///
/// The first five come from JSON-RPC 2.0, the server-error bounds and
/// `ServerNotInitialized`/`UnknownErrorCode` from the JSON-RPC reserved range,
/// and `RequestCancelled`/`ContentModified` are LSP extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON was received.
    ParseError,
    /// The JSON sent is not a valid request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// Lower bound of the reserved server-error range.
    ServerErrorStart,
    /// Upper bound of the reserved server-error range.
    ServerErrorEnd,
    /// A request arrived before the `initialize` handshake.
    ServerNotInitialized,
    /// Catch-all for unclassified server errors.
    UnknownErrorCode,
    /// The client cancelled the request.
    RequestCancelled,
    /// The document changed while the request was being served.
    ContentModified,
}

impl ErrorCode {
    /// Every code, in table order.
    pub const ALL: [Self; 11] = [
        Self::ParseError,
        Self::InvalidRequest,
        Self::MethodNotFound,
        Self::InvalidParams,
        Self::InternalError,
        Self::ServerErrorStart,
        Self::ServerErrorEnd,
        Self::ServerNotInitialized,
        Self::UnknownErrorCode,
        Self::RequestCancelled,
        Self::ContentModified,
    ];

    /// Returns the integer sent on the wire.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerErrorStart => -32099,
            Self::ServerErrorEnd => -32000,
            Self::ServerNotInitialized => -32002,
            Self::UnknownErrorCode => -32001,
            Self::RequestCancelled => -32800,
            Self::ContentModified => -32801,
        }
    }

    /// Returns the camelCase protocol name of the code.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ParseError => "parseError",
            Self::InvalidRequest => "invalidRequest",
            Self::MethodNotFound => "methodNotFound",
            Self::InvalidParams => "invalidParams",
            Self::InternalError => "internalError",
            Self::ServerErrorStart => "serverErrorStart",
            Self::ServerErrorEnd => "serverErrorEnd",
            Self::ServerNotInitialized => "serverNotInitialized",
            Self::UnknownErrorCode => "unknownErrorCode",
            Self::RequestCancelled => "requestCancelled",
            Self::ContentModified => "contentModified",
        }
    }

    /// Conventional message for an error response carrying this code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ServerErrorStart | Self::ServerErrorEnd => "Server error",
            Self::ServerNotInitialized => "Server not initialized",
            Self::UnknownErrorCode => "Unknown error",
            Self::RequestCancelled => "Request cancelled",
            Self::ContentModified => "Content modified",
        }
    }
}

impl TryFrom<i64> for ErrorCode {
    type Error = WireError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.code() == code)
            .ok_or(WireError::UnknownErrorCode { code })
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} ({})", self.name(), self.code())
    }
}
