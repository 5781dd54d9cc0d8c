// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Newline framing of the inbound byte stream.
//!
//! Bytes arrive from the socket in chunks of arbitrary size. The framer keeps
//! the partial tail between calls and emits one [`Line`] per `\n` seen.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

use super::error::ProtocolError;

/// Line delimiter used in both directions.
pub const LINE_DELIMITER: u8 = b'\n';

/// Default frame buffer capacity in bytes.
pub const DEFAULT_FRAME_CAPACITY: usize = 1024;

/// What to do when a line grows past the frame buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the first `capacity` bytes, drop the rest up to the next newline.
    #[default]
    Truncate,
    /// Reject the line with [`ProtocolError::FramingOverflow`].
    Fail,
}

/// One received line, without its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line(Vec<u8>);

impl Line {
    /// Wrap raw line bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes of the line.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the line as UTF-8.
    pub fn text(&self) -> Result<&str, ProtocolError> {
        std::str::from_utf8(&self.0).map_err(|e| ProtocolError::Decode {
            valid_up_to: e.valid_up_to(),
        })
    }

    /// Decode the line, replacing invalid sequences with U+FFFD.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Drop a single trailing carriage return (CRLF peers).
    pub fn without_trailing_cr(mut self) -> Self {
        if self.0.last() == Some(&b'\r') {
            self.0.pop();
        }
        self
    }

    /// True if the line is empty or only ASCII whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_whitespace())
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// Reassembles newline-delimited lines from arbitrarily chunked input.
pub struct LineFramer {
    buffer: Vec<u8>,
    capacity: usize,
    policy: OverflowPolicy,
    dropped: usize,
}

impl LineFramer {
    /// Create a framer with the given buffer capacity and overflow policy.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            policy,
            dropped: 0,
        }
    }

    /// Feed a chunk and collect every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Line>, ProtocolError> {
        let mut lines = Vec::new();
        self.feed_into(chunk, &mut lines)?;
        Ok(lines)
    }

    /// Feed a chunk, appending completed lines to `out`.
    ///
    /// On overflow with [`OverflowPolicy::Fail`], lines completed earlier in
    /// the same chunk are already in `out`; the partial line and the rest of
    /// the chunk are discarded.
    pub fn feed_into(&mut self, chunk: &[u8], out: &mut Vec<Line>) -> Result<(), ProtocolError> {
        for &byte in chunk {
            if byte == LINE_DELIMITER {
                if self.dropped > 0 {
                    warn!(
                        "Line truncated to {} bytes ({} bytes dropped)",
                        self.capacity, self.dropped
                    );
                    self.dropped = 0;
                }
                out.push(Line(std::mem::take(&mut self.buffer)));
                self.buffer.reserve(self.capacity);
                continue;
            }

            if self.buffer.len() < self.capacity {
                self.buffer.push(byte);
                continue;
            }

            match self.policy {
                OverflowPolicy::Truncate => {
                    self.dropped += 1;
                }
                OverflowPolicy::Fail => {
                    warn!("Frame buffer overflow at {} bytes", self.capacity);
                    self.reset();
                    return Err(ProtocolError::FramingOverflow {
                        capacity: self.capacity,
                    });
                }
            }
        }

        if !self.buffer.is_empty() {
            debug!("Holding {} bytes of partial line", self.buffer.len());
        }

        Ok(())
    }

    /// Discard any partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }

    /// Number of bytes waiting for a newline.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_CAPACITY, OverflowPolicy::default())
    }
}
