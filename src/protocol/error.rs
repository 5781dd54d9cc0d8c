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

//! Protocol error types.

use thiserror::Error;

/// Errors raised while framing, decoding or building protocol messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A line grew past the frame buffer capacity.
    #[error("line exceeds frame buffer capacity of {capacity} bytes")]
    FramingOverflow {
        /// Frame buffer capacity in bytes.
        capacity: usize,
    },

    /// Line bytes are not valid UTF-8.
    #[error("invalid UTF-8 in line after {valid_up_to} bytes")]
    Decode {
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// A password command was built with an empty secret.
    #[error("password must not be empty")]
    EmptyPassword,
}
