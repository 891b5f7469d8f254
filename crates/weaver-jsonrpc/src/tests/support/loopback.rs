//! In-memory stream whose writes become its subsequent reads.

use std::collections::VecDeque;
use std::io;

use serde_json::Value;

use crate::{JsonStream, StreamError};

/// Queue-backed [`JsonStream`] for exercising read-after-write paths.
#[derive(Debug, Default)]
pub struct LoopbackStream {
    pending: VecDeque<Value>,
    sent: Vec<Value>,
}

impl LoopbackStream {
    /// Queues a raw value for the next read without recording it as sent.
    pub fn push_incoming(&mut self, value: Value) {
        self.pending.push_back(value);
    }

    /// Values written so far, in order.
    pub fn sent(&self) -> &[Value] {
        &self.sent
    }

    /// Number of values waiting to be read.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl JsonStream for LoopbackStream {
    fn read_json_value(&mut self, max_bytes: usize) -> Result<Value, StreamError> {
        let value = self.pending.pop_front().ok_or_else(|| {
            StreamError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "loopback stream is empty",
            ))
        })?;
        let length = serde_json::to_vec(&value)?.len();
        if length > max_bytes {
            return Err(StreamError::MessageTooLarge {
                length,
                limit: max_bytes,
            });
        }
        Ok(value)
    }

    fn write_json_value(&mut self, value: &Value) -> Result<(), StreamError> {
        self.sent.push(value.clone());
        self.pending.push_back(value.clone());
        Ok(())
    }
}
