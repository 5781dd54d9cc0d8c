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

//! Session error types.

use std::time::Duration;
use thiserror::Error;

use crate::protocol::ProtocolError;

/// Errors reported by a [`Session`](super::Session).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    #[error("not connected")]
    NotConnected,

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
