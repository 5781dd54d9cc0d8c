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

//! Connection session to a single controller.
//!
//! A [`Session`] owns at most one live byte stream. The read half belongs to
//! a spawned receive loop that frames, classifies and publishes lines; the
//! write half stays with the session and is used by [`Session::send`].
//! All lifecycle methods take `&mut self`, so connect/disconnect sequences
//! can never interleave.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::error::SessionError;
use super::sink::EventSink;
use super::transport::{ByteStream, Connector, Peer};
use crate::protocol::{classify, encode, Command, LineFramer, OverflowPolicy, DEFAULT_FRAME_CAPACITY};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Failed => "Failed",
        }
    }
}

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound for opening the stream.
    pub connect_timeout: Duration,
    /// Upper bound for writing one command.
    pub write_timeout: Duration,
    /// Maximum bytes per read.
    pub read_chunk_size: usize,
    /// Frame buffer capacity.
    pub frame_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    /// Drop a trailing `\r` from each line before classification.
    pub trim_carriage_return: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(5),
            read_chunk_size: 256,
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            overflow_policy: OverflowPolicy::Truncate,
            trim_carriage_return: true,
        }
    }
}

/// State shared between the session and its receive loop.
struct Shared {
    state: Mutex<ConnectionState>,
    sink: Arc<dyn EventSink>,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    fn set_state(&self, to: ConnectionState) {
        let changed = {
            let mut state = self.state.lock();
            let changed = *state != to;
            *state = to;
            changed
        };

        if changed {
            debug!("Session state -> {}", to.as_str());
            self.sink.on_state_change(to);
        }
    }

    /// Move to `Failed` and report `error`, unless already failed.
    fn fail(&self, error: &SessionError) -> bool {
        {
            let mut state = self.state.lock();
            if *state == ConnectionState::Failed {
                debug!("Already failed, not reporting: {}", error);
                return false;
            }
            *state = ConnectionState::Failed;
        }

        error!("Session failed: {}", error);
        self.sink.on_state_change(ConnectionState::Failed);
        self.sink.on_error(error);
        true
    }
}

/// Resources of the live connection.
struct Link {
    writer: WriteHalf<Box<dyn ByteStream>>,
    stop_tx: Option<oneshot::Sender<()>>,
    receiver: Option<JoinHandle<()>>,
}

/// Session with one controller.
pub struct Session {
    connector: Box<dyn Connector>,
    shared: Arc<Shared>,
    config: SessionConfig,
    peer: Option<Peer>,
    link: Option<Link>,
}

impl Session {
    /// Create a disconnected session.
    pub fn new(
        connector: Box<dyn Connector>,
        sink: Arc<dyn EventSink>,
        config: SessionConfig,
    ) -> Self {
        Self {
            connector,
            shared: Arc::new(Shared {
                state: Mutex::new(ConnectionState::Disconnected),
                sink,
            }),
            config,
            peer: None,
            link: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Peer of the current or last connection.
    pub fn peer(&self) -> Option<&Peer> {
        self.peer.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connect to `peer`, replacing any existing connection.
    ///
    /// On success the session is `Connected`, a `STATUS` query has been
    /// written and the receive loop is running.
    pub async fn connect(&mut self, peer: Peer) -> Result<(), SessionError> {
        if self.link.is_some() {
            info!("Tearing down previous connection");
            self.release().await;
        }

        info!("Connecting to {}", peer);
        self.shared.set_state(ConnectionState::Connecting);
        self.peer = Some(peer.clone());

        let limit = self.config.connect_timeout;
        let stream = match tokio::time::timeout(limit, self.connector.connect(&peer)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                let err = SessionError::ConnectFailed(e.to_string());
                self.shared.fail(&err);
                return Err(err);
            }
            Err(_) => {
                let err = SessionError::Timeout {
                    operation: "connect",
                    after: limit,
                };
                self.shared.fail(&err);
                return Err(err);
            }
        };

        let (reader, writer) = tokio::io::split(stream);
        let (stop_tx, stop_rx) = oneshot::channel();
        self.link = Some(Link {
            writer,
            stop_tx: Some(stop_tx),
            receiver: None,
        });
        self.shared.sink.on_peer(&peer);
        self.shared.set_state(ConnectionState::Connected);
        info!("Connected to {}", peer.name);

        self.send(&Command::Status).await?;

        let receiver = ReceiveLoop {
            reader,
            stop_rx,
            shared: self.shared.clone(),
            framer: LineFramer::new(self.config.frame_capacity, self.config.overflow_policy),
            chunk_size: self.config.read_chunk_size.max(1),
            trim_carriage_return: self.config.trim_carriage_return,
        };
        let handle = tokio::spawn(receiver.run());
        if let Some(link) = self.link.as_mut() {
            link.receiver = Some(handle);
        }

        Ok(())
    }

    /// Write one command.
    ///
    /// Fails with [`SessionError::NotConnected`] unless `Connected`. A write
    /// error or timeout releases the connection and moves to `Failed`; the
    /// command is not retried.
    pub async fn send(&mut self, command: &Command) -> Result<(), SessionError> {
        if self.state() != ConnectionState::Connected {
            warn!("Cannot send {:?}: not connected", command);
            return Err(SessionError::NotConnected);
        }
        let Some(link) = self.link.as_mut() else {
            warn!("Cannot send {:?}: no stream", command);
            return Err(SessionError::NotConnected);
        };

        let bytes = encode(command);
        let limit = self.config.write_timeout;
        let writer = &mut link.writer;
        let result = tokio::time::timeout(limit, async {
            writer.write_all(&bytes).await?;
            writer.flush().await
        })
        .await;

        let err = match result {
            Ok(Ok(())) => {
                debug!("Sent command: {:?}", command);
                return Ok(());
            }
            Ok(Err(e)) => SessionError::WriteFailed(e.to_string()),
            Err(_) => SessionError::Timeout {
                operation: "write",
                after: limit,
            },
        };

        self.release().await;
        self.shared.fail(&err);
        Err(err)
    }

    /// Close the connection and wait for the receive loop to stop.
    ///
    /// A no-op when already `Disconnected`.
    pub async fn disconnect(&mut self) {
        if self.link.is_none() && self.state() == ConnectionState::Disconnected {
            debug!("Disconnect ignored: already disconnected");
            return;
        }

        self.release().await;
        self.shared.set_state(ConnectionState::Disconnected);
        info!("Disconnected");
    }

    /// Stop the receive loop and close the stream. Close errors are logged.
    async fn release(&mut self) {
        let Some(mut link) = self.link.take() else {
            return;
        };

        if let Some(stop_tx) = link.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(receiver) = link.receiver.take() {
            if let Err(e) = receiver.await {
                error!("Receive loop ended abnormally: {}", e);
            }
        }

        if let Err(e) = link.writer.shutdown().await {
            debug!("Ignoring close error: {}", e);
        }
    }
}

/// Reader side of a live connection.
struct ReceiveLoop {
    reader: ReadHalf<Box<dyn ByteStream>>,
    stop_rx: oneshot::Receiver<()>,
    shared: Arc<Shared>,
    framer: LineFramer,
    chunk_size: usize,
    trim_carriage_return: bool,
}

impl ReceiveLoop {
    async fn run(mut self) {
        debug!("Receive loop started");
        let mut buf = vec![0u8; self.chunk_size];
        let mut lines = Vec::new();

        loop {
            let read = tokio::select! {
                biased;
                _ = &mut self.stop_rx => {
                    debug!("Receive loop stop requested");
                    break;
                }
                read = self.reader.read(&mut buf) => read,
            };

            let n = match read {
                Ok(0) => {
                    info!("Connection closed by remote");
                    self.shared
                        .fail(&SessionError::ReadFailed("connection closed by peer".to_string()));
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    self.shared.fail(&SessionError::ReadFailed(e.to_string()));
                    break;
                }
            };

            let framed = self.framer.feed_into(&buf[..n], &mut lines);
            for line in lines.drain(..) {
                let line = if self.trim_carriage_return {
                    line.without_trailing_cr()
                } else {
                    line
                };

                debug!("Received: {}", line.to_text_lossy());
                if let Some(event) = classify(&line) {
                    self.shared.sink.publish(event);
                }
            }

            if let Err(e) = framed {
                self.shared.fail(&e.into());
                break;
            }
        }

        debug!("Receive loop exited");
    }
}
