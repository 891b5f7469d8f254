//! Typed message envelopes.
//!
//! Envelopes carry a typed payload and convert one way into [`Message`].
//! Typed decoding only happens through [`crate::transport`], which also
//! checks the message kind and method name.

use serde::Serialize;

use crate::error_code::ErrorCode;
use crate::errors::WireError;
use crate::id::RequestId;
use crate::message::{Message, Params};

/// A request with a typed parameter payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<T> {
    /// Correlation identifier.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Parameter payload.
    pub param: T,
}

/// A notification with a typed parameter payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<T> {
    /// Method name.
    pub method: String,
    /// Parameter payload.
    pub param: T,
}

/// A successful response with a typed result.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// Identifier of the answered request.
    pub id: RequestId,
    /// Result payload.
    pub result: T,
}

/// An error response with optional typed data.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError<T> {
    /// Identifier of the answered request.
    pub id: RequestId,
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// Optional additional data.
    pub data: Option<T>,
}

impl<T> Request<T> {
    /// Creates a request envelope.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, param: T) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            param,
        }
    }
}

impl<T: Serialize> Request<T> {
    /// Converts the envelope into an untyped message.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if the payload cannot be serialised and
    /// [`WireError::ScalarParams`] if it serialises to anything other than an
    /// object or array.
    pub fn into_message(self) -> Result<Message, WireError> {
        let params = structured_params(&self.method, &self.param)?;
        Ok(Message::Request {
            id: self.id,
            method: self.method,
            params: Some(params),
        })
    }
}

impl<T> Notification<T> {
    /// Creates a notification envelope.
    pub fn new(method: impl Into<String>, param: T) -> Self {
        Self {
            method: method.into(),
            param,
        }
    }
}

impl<T: Serialize> Notification<T> {
    /// Converts the envelope into an untyped message.
    ///
    /// # Errors
    ///
    /// Fails like [`Request::into_message`].
    pub fn into_message(self) -> Result<Message, WireError> {
        let params = structured_params(&self.method, &self.param)?;
        Ok(Message::Notification {
            method: self.method,
            params: Some(params),
        })
    }
}

impl<T> Response<T> {
    /// Creates a response envelope.
    pub fn new(id: impl Into<RequestId>, result: T) -> Self {
        Self {
            id: id.into(),
            result,
        }
    }
}

impl<T: Serialize> Response<T> {
    /// Converts the envelope into an untyped message.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if the result cannot be serialised.
    pub fn into_message(self) -> Result<Message, WireError> {
        Ok(Message::Response {
            id: self.id,
            result: serde_json::to_value(&self.result)?,
        })
    }
}

impl<T> ResponseError<T> {
    /// Creates an error envelope without data.
    pub fn new(id: impl Into<RequestId>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an error envelope using the code's conventional message.
    pub fn from_code(id: impl Into<RequestId>, code: ErrorCode) -> Self {
        Self::new(id, code, code.default_message())
    }

    /// Replaces the data payload.
    #[must_use]
    pub fn with_data<U>(self, data: U) -> ResponseError<U> {
        ResponseError {
            id: self.id,
            code: self.code,
            message: self.message,
            data: Some(data),
        }
    }

    /// Converts the envelope into an untyped message, dropping any data.
    #[must_use]
    pub fn into_message_without_data(self) -> Message {
        Message::ResponseError {
            id: self.id,
            code: self.code,
            message: self.message,
            data: None,
        }
    }
}

impl<T: Serialize> ResponseError<T> {
    /// Converts the envelope into an untyped message, keeping any data.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if the data cannot be serialised.
    pub fn into_message(self) -> Result<Message, WireError> {
        let data = self.data.as_ref().map(serde_json::to_value).transpose()?;
        Ok(Message::ResponseError {
            id: self.id,
            code: self.code,
            message: self.message,
            data,
        })
    }
}

impl<T: Serialize> TryFrom<Request<T>> for Message {
    type Error = WireError;

    fn try_from(envelope: Request<T>) -> Result<Self, Self::Error> {
        envelope.into_message()
    }
}

impl<T: Serialize> TryFrom<Notification<T>> for Message {
    type Error = WireError;

    fn try_from(envelope: Notification<T>) -> Result<Self, Self::Error> {
        envelope.into_message()
    }
}

impl<T: Serialize> TryFrom<Response<T>> for Message {
    type Error = WireError;

    fn try_from(envelope: Response<T>) -> Result<Self, Self::Error> {
        envelope.into_message()
    }
}

impl<T: Serialize> TryFrom<ResponseError<T>> for Message {
    type Error = WireError;

    fn try_from(envelope: ResponseError<T>) -> Result<Self, Self::Error> {
        envelope.into_message()
    }
}

fn structured_params<T: Serialize>(method: &str, param: &T) -> Result<Params, WireError> {
    let value = serde_json::to_value(param)?;
    Params::from_json(value).ok_or_else(|| WireError::ScalarParams {
        method: method.to_owned(),
    })
}
