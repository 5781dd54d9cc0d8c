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

//! Boundary between the session and the presentation layer.

use tokio::sync::mpsc;
use tracing::debug;

use super::error::SessionError;
use super::session::ConnectionState;
use super::transport::Peer;
use crate::protocol::Event;

/// Receives everything a session reports.
///
/// Called from both the caller task and the receive loop task.
/// Implementations must not block; a presentation layer that needs
/// single-threaded delivery should use [`ChannelSink`].
pub trait EventSink: Send + Sync {
    /// A classified line, in arrival order.
    fn publish(&self, event: Event);

    /// The session moved to a new state.
    fn on_state_change(&self, state: ConnectionState);

    /// A stream to `peer` was opened. Reported just before `Connected`.
    fn on_peer(&self, _peer: &Peer) {}

    /// A connection-level failure, reported once.
    fn on_error(&self, _error: &SessionError) {}
}

/// A session report, as delivered through a [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Event(Event),
    State(ConnectionState),
    /// Name of the controller a connection was opened to.
    Peer(String),
    Error(SessionError),
}

/// Sink that forwards every report to a channel drained by the consumer's task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionUpdate>,
}

impl ChannelSink {
    /// Create a sink and the receiver the presentation task reads from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, update: SessionUpdate) {
        if self.tx.send(update).is_err() {
            debug!("Update receiver dropped, discarding");
        }
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: Event) {
        self.forward(SessionUpdate::Event(event));
    }

    fn on_state_change(&self, state: ConnectionState) {
        self.forward(SessionUpdate::State(state));
    }

    fn on_peer(&self, peer: &Peer) {
        self.forward(SessionUpdate::Peer(peer.name.clone()));
    }

    fn on_error(&self, error: &SessionError) {
        self.forward(SessionUpdate::Error(error.clone()));
    }
}
