//! Configuration for JSON-RPC connections.

use serde::{Deserialize, Serialize};

/// Default upper bound on a single inbound message body.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Limits applied by a [`crate::Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireConfig {
    /// Largest inbound message body accepted, in bytes.
    pub max_message_bytes: usize,
}

impl WireConfig {
    /// Sets the inbound message size limit.
    #[must_use]
    pub const fn with_max_message_bytes(mut self, max_message_bytes: usize) -> Self {
        self.max_message_bytes = max_message_bytes;
        self
    }
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}
