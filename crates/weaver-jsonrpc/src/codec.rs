//! Conversion between [`Message`] and JSON values.
//!
//! Decoding classifies an untagged object by trying each message shape in a
//! fixed order and accepting the first structural match:
//!
//! 1. request (`id` and `method`)
//! 2. notification (`method`)
//! 3. response (`id` and `result`)
//! 4. error response (`id` and an `error` object with `code` and `message`)
//!
//! An object that satisfies several shapes is classified by this order rather
//! than rejected, so `{"id":1,"method":"m","result":0}` is a request. A
//! `params` member that is not an object or array is read as absent and never
//! decides the shape.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error_code::ErrorCode;
use crate::errors::WireError;
use crate::id::RequestId;
use crate::message::{Batch, Message, MessageKind, Params};

/// Protocol tag carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Log target for codec operations.
const CODEC_TARGET: &str = "weaver_jsonrpc::codec";

type Candidate = fn(&Map<String, Value>) -> Option<Message>;

/// Shape candidates in priority order. The order is load-bearing.
const CANDIDATES: [(MessageKind, Candidate); 4] = [
    (MessageKind::Request, request_candidate),
    (MessageKind::Notification, notification_candidate),
    (MessageKind::Response, response_candidate),
    (MessageKind::ResponseError, response_error_candidate),
];

/// Encodes a message as a JSON object.
///
/// Optional fields that are absent are omitted rather than written as `null`.
#[must_use]
pub fn encode(message: &Message) -> Value {
    let mut object = Map::new();
    object.insert(String::from("jsonrpc"), Value::from(JSONRPC_VERSION));

    match message {
        Message::Request { id, method, params } => {
            object.insert(String::from("id"), id.to_json());
            insert_call(&mut object, method, params.as_ref());
        }
        Message::Notification { method, params } => {
            insert_call(&mut object, method, params.as_ref());
        }
        Message::Response { id, result } => {
            object.insert(String::from("id"), id.to_json());
            object.insert(String::from("result"), result.clone());
        }
        Message::ResponseError {
            id,
            code,
            message,
            data,
        } => {
            let mut error = Map::new();
            error.insert(String::from("code"), Value::from(code.code()));
            error.insert(String::from("message"), Value::from(message.as_str()));
            if let Some(data) = data {
                error.insert(String::from("data"), data.clone());
            }
            object.insert(String::from("id"), id.to_json());
            object.insert(String::from("error"), Value::Object(error));
        }
    }

    Value::Object(object)
}

fn insert_call(object: &mut Map<String, Value>, method: &str, params: Option<&Params>) {
    object.insert(String::from("method"), Value::from(method));
    if let Some(params) = params {
        object.insert(String::from("params"), params.to_json());
    }
}

/// Decodes a JSON value into a message.
///
/// # Errors
///
/// Returns [`WireError::Decode`] when the value is not an object tagged
/// `"jsonrpc":"2.0"` or matches none of the four message shapes.
pub fn decode(value: &Value) -> Result<Message, WireError> {
    let Some(object) = value.as_object() else {
        return Err(WireError::decode(value));
    };
    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        trace!(target: CODEC_TARGET, "missing or unsupported jsonrpc tag");
        return Err(WireError::decode(value));
    }

    for (kind, candidate) in CANDIDATES {
        if let Some(message) = candidate(object) {
            return Ok(message);
        }
        trace!(target: CODEC_TARGET, candidate = %kind, "shape did not match");
    }

    Err(WireError::decode(value))
}

/// Encodes a batch as a JSON array, preserving order.
#[must_use]
pub fn encode_batch(batch: &[Message]) -> Value {
    Value::Array(batch.iter().map(encode).collect())
}

/// Decodes a batch.
///
/// A single message object yields a one-element batch. An array must be
/// non-empty and every element must decode; the first failure is returned.
///
/// # Errors
///
/// Returns [`WireError::Decode`] for an empty array, a scalar, or any element
/// that does not decode.
pub fn decode_batch(value: &Value) -> Result<Batch, WireError> {
    match value {
        Value::Array(items) if items.is_empty() => Err(WireError::decode(value)),
        Value::Array(items) => items.iter().map(decode).collect(),
        Value::Object(_) => decode(value).map(|message| vec![message]),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(WireError::decode(value))
        }
    }
}

fn id_field(object: &Map<String, Value>) -> Option<RequestId> {
    object.get("id").and_then(RequestId::from_json)
}

fn method_field(object: &Map<String, Value>) -> Option<String> {
    object
        .get("method")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Reads `params`; anything but an object or array counts as absent.
fn params_field(object: &Map<String, Value>) -> Option<Params> {
    object.get("params").cloned().and_then(Params::from_json)
}

fn request_candidate(object: &Map<String, Value>) -> Option<Message> {
    let id = id_field(object)?;
    let method = method_field(object)?;
    let params = params_field(object);
    Some(Message::Request { id, method, params })
}

fn notification_candidate(object: &Map<String, Value>) -> Option<Message> {
    let method = method_field(object)?;
    let params = params_field(object);
    Some(Message::Notification { method, params })
}

fn response_candidate(object: &Map<String, Value>) -> Option<Message> {
    let id = id_field(object)?;
    let result = object.get("result")?.clone();
    Some(Message::Response { id, result })
}

fn response_error_candidate(object: &Map<String, Value>) -> Option<Message> {
    let id = id_field(object)?;
    let error = object.get("error")?.as_object()?;
    let code = error
        .get("code")
        .and_then(Value::as_i64)
        .and_then(|code| ErrorCode::try_from(code).ok())?;
    let message = error.get("message")?.as_str()?.to_owned();
    let data = error.get("data").cloned();
    Some(Message::ResponseError {
        id,
        code,
        message,
        data,
    })
}
