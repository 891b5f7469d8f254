//! Unit tests for typed transport operations and connections.

use std::collections::BTreeMap;
use std::io::Cursor;

use lsp_types::{InitializeParams, InitializedParams, PublishDiagnosticsParams};
use rstest::rstest;
use serde_json::{Value, json};

use crate::tests::support::{LoopbackStream, TEST_LIMIT, initialize_params, loopback};
use crate::{
    Connection, ErrorCode, FramedStream, Message, MessageKind, Notification, Request, RequestId,
    Response, ResponseError, StreamError, WireConfig, WireError, transport,
};

#[rstest]
fn request_round_trips_through_the_same_stream(mut loopback: LoopbackStream) {
    let params = initialize_params();

    transport::write_request(&mut loopback, Request::new(1, "initialize", params.clone()))
        .expect("write failed");
    let request: Request<InitializeParams> =
        transport::read_request_as(&mut loopback, TEST_LIMIT, "initialize").expect("read failed");

    assert_eq!(request.id, RequestId::from(1));
    assert_eq!(request.method, "initialize");
    assert_eq!(request.param, params);
}

#[rstest]
fn empty_object_payload_round_trips(mut loopback: LoopbackStream) {
    let payload: BTreeMap<String, Value> = BTreeMap::new();

    transport::write_request(&mut loopback, Request::new(1, "initialize", payload.clone()))
        .expect("write failed");

    assert_eq!(
        loopback.sent(),
        [json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})]
    );
    let request: Request<BTreeMap<String, Value>> =
        transport::read_request_as(&mut loopback, TEST_LIMIT, "initialize").expect("read failed");
    assert_eq!(request.param, payload);
}

#[rstest]
fn notification_is_not_a_request(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({"jsonrpc": "2.0", "method": "foo", "params": {}}));

    let result = transport::read_request_as::<Value, _>(&mut loopback, TEST_LIMIT, "bar");

    match result {
        Err(WireError::UnexpectedMessageKind { expected, found }) => {
            assert_eq!(expected, MessageKind::Request);
            assert_eq!(found, MessageKind::Notification);
        }
        other => panic!("expected unexpected message kind, got {other:?}"),
    }
}

#[rstest]
fn request_is_not_a_notification(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "initialized",
        "params": {}
    }));

    let result = transport::read_notification_as::<InitializedParams, _>(
        &mut loopback,
        TEST_LIMIT,
        "initialized",
    );

    assert!(matches!(
        result,
        Err(WireError::UnexpectedMessageKind {
            expected: MessageKind::Notification,
            found: MessageKind::Request,
        })
    ));
}

#[rstest]
fn method_mismatch_names_both_methods(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({"jsonrpc": "2.0", "id": 1, "method": "foo", "params": {}}));

    let error = transport::read_request_as::<Value, _>(&mut loopback, TEST_LIMIT, "bar")
        .expect_err("method must not match");

    match &error {
        WireError::MethodMismatch { expected, found } => {
            assert_eq!(expected, "bar");
            assert_eq!(found, "foo");
        }
        other => panic!("expected method mismatch, got {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains("foo") && message.contains("bar"), "{message}");
}

#[rstest]
fn missing_params_are_reported(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({"jsonrpc": "2.0", "method": "initialized"}));

    let result = transport::read_notification_as::<InitializedParams, _>(
        &mut loopback,
        TEST_LIMIT,
        "initialized",
    );

    match result {
        Err(WireError::MissingParams { method }) => assert_eq!(method, "initialized"),
        other => panic!("expected missing params, got {other:?}"),
    }
}

#[rstest]
fn undecodable_params_embed_method_and_raw_json(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({
        "jsonrpc": "2.0",
        "method": "textDocument/publishDiagnostics",
        "params": {"uri": 7}
    }));

    let error = transport::read_notification_as::<PublishDiagnosticsParams, _>(
        &mut loopback,
        TEST_LIMIT,
        "textDocument/publishDiagnostics",
    )
    .expect_err("params must not decode");

    match &error {
        WireError::ParamDecode { method, raw, .. } => {
            assert_eq!(method, "textDocument/publishDiagnostics");
            assert_eq!(raw, r#"{"uri":7}"#);
        }
        other => panic!("expected param decode error, got {other:?}"),
    }
    assert!(error.to_string().contains(r#"{"uri":7}"#));
}

#[rstest]
fn narrow_error_path_omits_data(mut loopback: LoopbackStream) {
    let error = ResponseError::<()>::new(1, ErrorCode::InternalError, "x").with_data(42);

    transport::write_response_error(&mut loopback, error).expect("write failed");

    assert_eq!(
        loopback.sent(),
        [json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32603, "message": "x"}})]
    );
}

#[rstest]
fn typed_error_path_keeps_data(mut loopback: LoopbackStream) {
    let error = ResponseError::<()>::new(1, ErrorCode::InternalError, "x").with_data(42);

    transport::write_response_error_with_data(&mut loopback, error).expect("write failed");

    assert_eq!(
        loopback.sent(),
        [json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32603, "message": "x", "data": 42}
        })]
    );
}

#[rstest]
fn responses_are_read_back_as_messages(mut loopback: LoopbackStream) {
    transport::write_response(&mut loopback, Response::new("abc", vec![1, 2]))
        .expect("write failed");

    let message = transport::read_message(&mut loopback, TEST_LIMIT).expect("read failed");

    assert_eq!(
        message,
        Message::Response {
            id: RequestId::from("abc"),
            result: json!([1, 2]),
        }
    );
}

#[rstest]
fn scalar_payloads_are_not_written(mut loopback: LoopbackStream) {
    let result = transport::write_notification(&mut loopback, Notification::new("exit", ()));

    assert!(matches!(result, Err(WireError::ScalarParams { .. })));
    assert!(loopback.sent().is_empty());
}

#[rstest]
fn decode_failure_leaves_the_stream_usable(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({"jsonrpc": "1.0", "method": "exit"}));
    loopback.push_incoming(json!({"jsonrpc": "2.0", "method": "exit"}));

    match transport::read_message(&mut loopback, TEST_LIMIT) {
        Err(WireError::Decode { raw }) => {
            assert_eq!(raw, r#"{"jsonrpc":"1.0","method":"exit"}"#);
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    let message = transport::read_message(&mut loopback, TEST_LIMIT).expect("read failed");
    assert_eq!(message.method(), Some("exit"));
}

#[rstest]
fn stream_limits_surface_as_stream_errors(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({"jsonrpc": "2.0", "method": "exit"}));

    let result = transport::read_message(&mut loopback, 8);

    assert!(matches!(
        result,
        Err(WireError::Stream(StreamError::MessageTooLarge { limit: 8, .. }))
    ));
    assert_eq!(loopback.pending_len(), 0);
}

#[rstest]
fn batches_round_trip_in_order(mut loopback: LoopbackStream) {
    let batch = vec![
        Message::Notification {
            method: String::from("initialized"),
            params: None,
        },
        Message::Response {
            id: RequestId::from(9),
            result: Value::Null,
        },
    ];

    transport::write_batch(&mut loopback, &batch).expect("write failed");

    assert_eq!(
        transport::read_batch(&mut loopback, TEST_LIMIT).expect("read failed"),
        batch
    );
}

#[rstest]
fn connection_assigns_sequential_ids() {
    let mut connection = Connection::new(LoopbackStream::default());

    let first = connection
        .send_request("shutdown", json!([]))
        .expect("send failed");
    let second = connection
        .send_request("shutdown", json!([]))
        .expect("send failed");

    assert_eq!(first, RequestId::from(1));
    assert_eq!(second, RequestId::from(2));
    let request: Request<Value> = connection
        .read_request_as("shutdown")
        .expect("read failed");
    assert_eq!(request.id, first);
}

#[rstest]
fn connection_applies_configured_limit() {
    let config = WireConfig::default().with_max_message_bytes(4);
    let mut connection = Connection::with_config(LoopbackStream::default(), config);

    connection
        .send_notification("initialized", json!({}))
        .expect("send failed");

    assert!(matches!(
        connection.read_message(),
        Err(WireError::Stream(StreamError::MessageTooLarge { limit: 4, .. }))
    ));
}

#[rstest]
fn connection_answers_over_framed_stdio() {
    let mut server = Connection::new(FramedStream::new(Cursor::new(Vec::new()), Vec::new()));

    server
        .respond(RequestId::from(1), json!({"capabilities": {}}))
        .expect("respond failed");
    server
        .respond_error(ResponseError::<()>::from_code(2, ErrorCode::MethodNotFound))
        .expect("respond failed");
    server
        .respond_error_with_data(
            ResponseError::<()>::from_code(3, ErrorCode::InvalidParams).with_data("rootUri"),
        )
        .expect("respond failed");

    let (_, bytes) = server.into_inner().into_parts();
    let mut client = Connection::new(FramedStream::new(Cursor::new(bytes), Vec::new()));
    let kinds: Vec<MessageKind> = (0..3)
        .map(|_| client.read_message().map(|message| message.kind()))
        .collect::<Result<_, _>>()
        .expect("read failed");
    assert_eq!(
        kinds,
        [
            MessageKind::Response,
            MessageKind::ResponseError,
            MessageKind::ResponseError,
        ]
    );
}

#[rstest]
fn notifications_are_read_with_typed_params(mut loopback: LoopbackStream) {
    transport::write_notification(
        &mut loopback,
        Notification::new("initialized", InitializedParams {}),
    )
    .expect("write failed");

    let notification: Notification<InitializedParams> =
        transport::read_notification_as(&mut loopback, TEST_LIMIT, "initialized")
            .expect("read failed");

    assert_eq!(notification.method, "initialized");
    assert_eq!(notification.param, InitializedParams {});
}

#[rstest]
fn scalar_params_read_as_missing(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "shutdown",
        "params": 3
    }));

    let result = transport::read_request_as::<Value, _>(&mut loopback, TEST_LIMIT, "shutdown");

    match result {
        Err(WireError::MissingParams { method }) => assert_eq!(method, "shutdown"),
        other => panic!("expected missing params, got {other:?}"),
    }
}

#[rstest]
fn fractional_request_ids_are_answered(mut loopback: LoopbackStream) {
    loopback.push_incoming(json!({
        "jsonrpc": "2.0",
        "id": 1.5,
        "method": "shutdown",
        "params": []
    }));

    let request: Request<Value> =
        transport::read_request_as(&mut loopback, TEST_LIMIT, "shutdown").expect("read failed");
    transport::write_response(&mut loopback, Response::new(request.id, Value::Null))
        .expect("write failed");

    assert_eq!(
        loopback.sent().last(),
        Some(&json!({"jsonrpc": "2.0", "id": 1.5, "result": null}))
    );
}
