//! Streams carrying whole JSON values.
//!
//! The message layer only needs to read and write complete JSON values.
//! [`FramedStream`] provides the LSP flavour of that contract over any
//! reader and writer pair:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{BufRead, Read, Write};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::StreamError;

/// Log target for stream operations.
const STREAM_TARGET: &str = "weaver_jsonrpc::stream";

/// Largest oversized body [`FramedStream`] skips by default (256 MiB).
pub const DEFAULT_MAX_DRAIN_BYTES: usize = 256 * 1024 * 1024;

/// A bidirectional stream of complete JSON values.
///
/// Implementations own framing and buffering. The message layer performs no
/// locking, so callers sharing a stream must serialise access themselves.
pub trait JsonStream {
    /// Reads exactly one complete JSON value of at most `max_bytes` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] if no well-formed value within the bound is
    /// available.
    fn read_json_value(&mut self, max_bytes: usize) -> Result<Value, StreamError>;

    /// Writes exactly one complete JSON value.
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] if the value cannot be written.
    fn write_json_value(&mut self, value: &Value) -> Result<(), StreamError>;
}

impl<S: JsonStream + ?Sized> JsonStream for &mut S {
    fn read_json_value(&mut self, max_bytes: usize) -> Result<Value, StreamError> {
        (**self).read_json_value(max_bytes)
    }

    fn write_json_value(&mut self, value: &Value) -> Result<(), StreamError> {
        (**self).write_json_value(value)
    }
}

impl<S: JsonStream + ?Sized> JsonStream for Box<S> {
    fn read_json_value(&mut self, max_bytes: usize) -> Result<Value, StreamError> {
        (**self).read_json_value(max_bytes)
    }

    fn write_json_value(&mut self, value: &Value) -> Result<(), StreamError> {
        (**self).write_json_value(value)
    }
}

/// Reads and writes `Content-Length` framed JSON values.
///
/// Typically wraps a language server's stdout (as a `BufReader`) and stdin.
/// Each body is consumed in full before it is parsed, so a malformed payload
/// leaves the stream positioned at the next frame. A body over the caller's
/// limit is skipped the same way, but only up to the drain limit: a larger
/// announced length is refused without reading it, because skipping would
/// block on the peer's header claim.
#[derive(Debug)]
pub struct FramedStream<R, W> {
    reader: R,
    writer: W,
    max_drain_bytes: usize,
}

impl<R: BufRead, W: Write> FramedStream<R, W> {
    /// Creates a stream from a buffered reader and a writer.
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_drain_bytes: DEFAULT_MAX_DRAIN_BYTES,
        }
    }

    /// Sets the largest oversized body that is skipped rather than refused.
    #[must_use]
    pub const fn with_max_drain_bytes(mut self, max_drain_bytes: usize) -> Self {
        self.max_drain_bytes = max_drain_bytes;
        self
    }

    /// Returns the underlying reader and writer.
    #[must_use]
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Returns a reference to the underlying writer.
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Reads headers and extracts the Content-Length value.
    fn read_headers(&mut self) -> Result<usize, StreamError> {
        let mut content_length: Option<usize> = None;

        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(StreamError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }

            content_length = parse_header(trimmed)?.or(content_length);
        }

        content_length.ok_or(StreamError::MissingContentLength)
    }
}

/// Parses one header line, returning the length for `Content-Length`.
///
/// Other well-formed headers (e.g. `Content-Type`) are ignored.
fn parse_header(line: &str) -> Result<Option<usize>, StreamError> {
    let Some((name, value)) = line.split_once(':') else {
        return Err(StreamError::InvalidHeader);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| StreamError::InvalidHeader)
}

impl<R: BufRead, W: Write> JsonStream for FramedStream<R, W> {
    fn read_json_value(&mut self, max_bytes: usize) -> Result<Value, StreamError> {
        let length = self.read_headers()?;
        if length > max_bytes && length > self.max_drain_bytes {
            warn!(target: STREAM_TARGET, length, "refusing frame too large to skip");
            return Err(StreamError::FrameUnrecoverable {
                length,
                limit: self.max_drain_bytes,
            });
        }
        if length > max_bytes {
            // Drain the oversized body so the next frame stays readable.
            let limit = u64::try_from(length).unwrap_or(u64::MAX);
            std::io::copy(&mut (&mut self.reader).take(limit), &mut std::io::sink())?;
            return Err(StreamError::MessageTooLarge {
                length,
                limit: max_bytes,
            });
        }

        let mut body = vec![0_u8; length];
        self.reader.read_exact(&mut body)?;
        debug!(target: STREAM_TARGET, length, "received frame");
        Ok(serde_json::from_slice(&body)?)
    }

    fn write_json_value(&mut self, value: &Value) -> Result<(), StreamError> {
        let payload = serde_json::to_vec(value)?;
        let header = format!("Content-Length: {}\r\n\r\n", payload.len());
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(&payload)?;
        self.writer.flush()?;
        debug!(target: STREAM_TARGET, length = payload.len(), "sent frame");
        Ok(())
    }
}
