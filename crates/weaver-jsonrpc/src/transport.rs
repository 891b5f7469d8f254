//! Typed read and write operations over a [`JsonStream`].
//!
//! Every operation performs exactly one blocking stream call. Failures are
//! scoped to the call: the stream remains usable for the next message.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::codec;
use crate::envelope::{Notification, Request, Response, ResponseError};
use crate::errors::WireError;
use crate::message::{Batch, Message, MessageKind, Params};
use crate::stream::JsonStream;

/// Log target for transport operations.
const TRANSPORT_TARGET: &str = "weaver_jsonrpc::transport";

/// Reads and decodes one message.
///
/// # Errors
///
/// Returns [`WireError::Stream`] if the stream fails and
/// [`WireError::Decode`] if the value is not a JSON-RPC 2.0 message.
pub fn read_message<S>(stream: &mut S, max_bytes: usize) -> Result<Message, WireError>
where
    S: JsonStream + ?Sized,
{
    let value = stream.read_json_value(max_bytes)?;
    let message = codec::decode(&value)?;
    debug!(
        target: TRANSPORT_TARGET,
        kind = %message.kind(),
        method = message.method(),
        id = message.id().map(tracing::field::display),
        "received message"
    );
    Ok(message)
}

/// Reads a request for `expected_method` and decodes its params into `T`.
///
/// # Errors
///
/// Besides the failures of [`read_message`], returns
/// [`WireError::UnexpectedMessageKind`] for anything but a request,
/// [`WireError::MethodMismatch`] for another method,
/// [`WireError::MissingParams`] when params are absent and
/// [`WireError::ParamDecode`] when they do not decode into `T`.
pub fn read_request_as<T, S>(
    stream: &mut S,
    max_bytes: usize,
    expected_method: &str,
) -> Result<Request<T>, WireError>
where
    T: DeserializeOwned,
    S: JsonStream + ?Sized,
{
    let message = read_message(stream, max_bytes)?;
    let found = message.kind();
    let Message::Request { id, method, params } = message else {
        return Err(reject(WireError::unexpected_kind(
            MessageKind::Request,
            found,
        )));
    };
    let param = typed_params(expected_method, method, params)?;
    Ok(Request {
        id,
        method: expected_method.to_owned(),
        param,
    })
}

/// Reads a notification for `expected_method` and decodes its params into `T`.
///
/// # Errors
///
/// Fails like [`read_request_as`], with the notification kind expected.
pub fn read_notification_as<T, S>(
    stream: &mut S,
    max_bytes: usize,
    expected_method: &str,
) -> Result<Notification<T>, WireError>
where
    T: DeserializeOwned,
    S: JsonStream + ?Sized,
{
    let message = read_message(stream, max_bytes)?;
    let found = message.kind();
    let Message::Notification { method, params } = message else {
        return Err(reject(WireError::unexpected_kind(
            MessageKind::Notification,
            found,
        )));
    };
    let param = typed_params(expected_method, method, params)?;
    Ok(Notification {
        method: expected_method.to_owned(),
        param,
    })
}

/// Reads one value and decodes it as a batch.
///
/// # Errors
///
/// Returns [`WireError::Stream`] if the stream fails and
/// [`WireError::Decode`] if the value is not a valid batch.
pub fn read_batch<S>(stream: &mut S, max_bytes: usize) -> Result<Batch, WireError>
where
    S: JsonStream + ?Sized,
{
    let value = stream.read_json_value(max_bytes)?;
    let batch = codec::decode_batch(&value)?;
    debug!(target: TRANSPORT_TARGET, size = batch.len(), "received batch");
    Ok(batch)
}

/// Checks the method name and decodes params into the payload type.
fn typed_params<T: DeserializeOwned>(
    expected_method: &str,
    method: String,
    params: Option<Params>,
) -> Result<T, WireError> {
    if method != expected_method {
        return Err(reject(WireError::method_mismatch(expected_method, method)));
    }
    let Some(params) = params else {
        return Err(reject(WireError::MissingParams { method }));
    };
    let value = params.into_json();
    T::deserialize(&value).map_err(|source| reject(WireError::param_decode(method, &value, source)))
}

fn reject(error: WireError) -> WireError {
    warn!(target: TRANSPORT_TARGET, %error, "rejecting message");
    error
}

/// Encodes and writes one message.
///
/// # Errors
///
/// Returns [`WireError::Stream`] if the stream rejects the value.
pub fn write_message<S>(stream: &mut S, message: &Message) -> Result<(), WireError>
where
    S: JsonStream + ?Sized,
{
    stream.write_json_value(&codec::encode(message))?;
    debug!(
        target: TRANSPORT_TARGET,
        kind = %message.kind(),
        method = message.method(),
        id = message.id().map(tracing::field::display),
        "sent message"
    );
    Ok(())
}

/// Writes a typed request.
///
/// # Errors
///
/// Returns the conversion errors of [`Request::into_message`] or
/// [`WireError::Stream`].
pub fn write_request<T, S>(stream: &mut S, request: Request<T>) -> Result<(), WireError>
where
    T: Serialize,
    S: JsonStream + ?Sized,
{
    write_message(stream, &request.into_message()?)
}

/// Writes a typed notification.
///
/// # Errors
///
/// Returns the conversion errors of [`Notification::into_message`] or
/// [`WireError::Stream`].
pub fn write_notification<T, S>(
    stream: &mut S,
    notification: Notification<T>,
) -> Result<(), WireError>
where
    T: Serialize,
    S: JsonStream + ?Sized,
{
    write_message(stream, &notification.into_message()?)
}

/// Writes a typed response.
///
/// # Errors
///
/// Returns [`WireError::Encode`] if the result cannot be serialised, or
/// [`WireError::Stream`].
pub fn write_response<T, S>(stream: &mut S, response: Response<T>) -> Result<(), WireError>
where
    T: Serialize,
    S: JsonStream + ?Sized,
{
    write_message(stream, &response.into_message()?)
}

/// Writes an error response without its data.
///
/// The `data` field is never put on the wire, whatever the envelope carries,
/// so internal state cannot leak through this path.
///
/// # Errors
///
/// Returns [`WireError::Stream`] if the stream rejects the value.
pub fn write_response_error<T, S>(stream: &mut S, error: ResponseError<T>) -> Result<(), WireError>
where
    S: JsonStream + ?Sized,
{
    write_message(stream, &error.into_message_without_data())
}

/// Writes an error response including its data when present.
///
/// # Errors
///
/// Returns [`WireError::Encode`] if the data cannot be serialised, or
/// [`WireError::Stream`].
pub fn write_response_error_with_data<T, S>(
    stream: &mut S,
    error: ResponseError<T>,
) -> Result<(), WireError>
where
    T: Serialize,
    S: JsonStream + ?Sized,
{
    write_message(stream, &error.into_message()?)
}

/// Encodes and writes a batch as one JSON array.
///
/// # Errors
///
/// Returns [`WireError::Stream`] if the stream rejects the value.
pub fn write_batch<S>(stream: &mut S, batch: &[Message]) -> Result<(), WireError>
where
    S: JsonStream + ?Sized,
{
    stream.write_json_value(&codec::encode_batch(batch))?;
    debug!(target: TRANSPORT_TARGET, size = batch.len(), "sent batch");
    Ok(())
}
