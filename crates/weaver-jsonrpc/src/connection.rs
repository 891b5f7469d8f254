//! A stream bundled with its limits and request identifier source.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::WireConfig;
use crate::envelope::{Notification, Request, Response, ResponseError};
use crate::errors::WireError;
use crate::id::{RequestId, RequestIdGenerator};
use crate::message::Message;
use crate::stream::JsonStream;
use crate::transport;

/// One end of a JSON-RPC conversation.
///
/// Every method takes `&mut self`, so a connection has a single reader and a
/// single writer at any time. Beyond the identifier counter it keeps no state
/// between calls.
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    config: WireConfig,
    ids: RequestIdGenerator,
}

impl<S: JsonStream> Connection<S> {
    /// Wraps a stream using the default configuration.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, WireConfig::default())
    }

    /// Wraps a stream using the supplied configuration.
    #[must_use]
    pub const fn with_config(stream: S, config: WireConfig) -> Self {
        Self {
            stream,
            config,
            ids: RequestIdGenerator::new(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Returns the underlying stream.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Reads the next message.
    ///
    /// # Errors
    ///
    /// See [`transport::read_message`].
    pub fn read_message(&mut self) -> Result<Message, WireError> {
        transport::read_message(&mut self.stream, self.config.max_message_bytes)
    }

    /// Reads a request for `method` with params of type `T`.
    ///
    /// # Errors
    ///
    /// See [`transport::read_request_as`].
    pub fn read_request_as<T: DeserializeOwned>(
        &mut self,
        method: &str,
    ) -> Result<Request<T>, WireError> {
        transport::read_request_as(&mut self.stream, self.config.max_message_bytes, method)
    }

    /// Reads a notification for `method` with params of type `T`.
    ///
    /// # Errors
    ///
    /// See [`transport::read_notification_as`].
    pub fn read_notification_as<T: DeserializeOwned>(
        &mut self,
        method: &str,
    ) -> Result<Notification<T>, WireError> {
        transport::read_notification_as(&mut self.stream, self.config.max_message_bytes, method)
    }

    /// Sends a request under the next identifier and returns that identifier.
    ///
    /// # Errors
    ///
    /// See [`transport::write_request`].
    pub fn send_request<T: Serialize>(
        &mut self,
        method: &str,
        param: T,
    ) -> Result<RequestId, WireError> {
        let id = self.ids.next_id();
        transport::write_request(&mut self.stream, Request::new(id.clone(), method, param))?;
        Ok(id)
    }

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// See [`transport::write_notification`].
    pub fn send_notification<T: Serialize>(
        &mut self,
        method: &str,
        param: T,
    ) -> Result<(), WireError> {
        transport::write_notification(&mut self.stream, Notification::new(method, param))
    }

    /// Answers a request with a result.
    ///
    /// # Errors
    ///
    /// See [`transport::write_response`].
    pub fn respond<T: Serialize>(&mut self, id: RequestId, result: T) -> Result<(), WireError> {
        transport::write_response(&mut self.stream, Response::new(id, result))
    }

    /// Answers a request with an error, never sending its data.
    ///
    /// # Errors
    ///
    /// See [`transport::write_response_error`].
    pub fn respond_error<T>(&mut self, error: ResponseError<T>) -> Result<(), WireError> {
        transport::write_response_error(&mut self.stream, error)
    }

    /// Answers a request with an error including its data.
    ///
    /// # Errors
    ///
    /// See [`transport::write_response_error_with_data`].
    pub fn respond_error_with_data<T: Serialize>(
        &mut self,
        error: ResponseError<T>,
    ) -> Result<(), WireError> {
        transport::write_response_error_with_data(&mut self.stream, error)
    }
}
