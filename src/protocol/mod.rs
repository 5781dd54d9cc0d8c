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

//! Controller line protocol.
//!
//! Inbound: `\n`-terminated status lines (`Alarm:`, `Door:`, `Alert:`,
//! `[ALERT]`). Outbound: `\n`-terminated command keywords. No checksums and
//! no acknowledgements.

pub mod classifier;
pub mod command;
pub mod error;
pub mod framer;

pub use classifier::{classify, classify_text, Event, EventKind};
pub use command::{encode, Command};
pub use error::ProtocolError;
pub use framer::{Line, LineFramer, OverflowPolicy, DEFAULT_FRAME_CAPACITY};
