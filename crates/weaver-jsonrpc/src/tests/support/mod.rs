//! Shared fixtures and helpers for message layer tests.

#[path = "loopback.rs"]
mod loopback_stream;

use lsp_types::{ClientCapabilities, InitializeParams};
use rstest::fixture;

pub use loopback_stream::LoopbackStream;

/// Byte limit used by tests reading from a loopback stream.
pub const TEST_LIMIT: usize = 64 * 1024;

/// Empty loopback stream.
#[fixture]
pub fn loopback() -> LoopbackStream {
    LoopbackStream::default()
}

/// Minimal `initialize` params as a client would send them.
#[must_use]
pub fn initialize_params() -> InitializeParams {
    InitializeParams {
        process_id: Some(4242),
        capabilities: ClientCapabilities::default(),
        ..InitializeParams::default()
    }
}
