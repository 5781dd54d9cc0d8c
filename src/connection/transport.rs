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

//! Duplex byte-stream transports.
//!
//! The session only needs a bidirectional byte channel. Bluetooth RFCOMM
//! (serial port profile) is the normal transport; TCP covers serial-over-IP
//! bridges.

use anyhow::{anyhow, Result};
use bluer::rfcomm::{SocketAddr, Stream};
use bluer::Address;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::io;
use std::str::FromStr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::info;

/// Default RFCOMM channel of HC-05/HC-06 style serial modules.
pub const DEFAULT_RFCOMM_CHANNEL: u8 = 1;

/// A duplex byte stream the session can own.
pub trait ByteStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> ByteStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Where a peer can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerAddress {
    /// Bluetooth device address and RFCOMM channel.
    Rfcomm { address: Address, channel: u8 },
    /// `host:port` of a TCP serial bridge.
    Tcp(String),
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rfcomm { address, channel } => write!(f, "rfcomm://{}/{}", address, channel),
            Self::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

/// A previously identified controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// Display name.
    pub name: String,
    pub address: PeerAddress,
}

impl Peer {
    /// Bluetooth peer on the given RFCOMM channel.
    pub fn rfcomm(name: impl Into<String>, address: &str, channel: u8) -> Result<Self> {
        let address = Address::from_str(address)
            .map_err(|e| anyhow!("Invalid Bluetooth address '{}': {}", address, e))?;
        Ok(Self {
            name: name.into(),
            address: PeerAddress::Rfcomm { address, channel },
        })
    }

    /// TCP serial bridge peer.
    pub fn tcp(name: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: PeerAddress::Tcp(addr.into()),
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Opens byte streams to peers.
pub trait Connector: Send + Sync {
    fn connect<'a>(&'a self, peer: &'a Peer) -> BoxFuture<'a, io::Result<Box<dyn ByteStream>>>;
}

/// Connector backed by BlueZ RFCOMM sockets and TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConnector;

impl Connector for SystemConnector {
    fn connect<'a>(&'a self, peer: &'a Peer) -> BoxFuture<'a, io::Result<Box<dyn ByteStream>>> {
        async move {
            match &peer.address {
                PeerAddress::Rfcomm { address, channel } => {
                    info!("Opening RFCOMM channel {} to {}", channel, address);
                    let stream = Stream::connect(SocketAddr::new(*address, *channel)).await?;
                    Ok(Box::new(stream) as Box<dyn ByteStream>)
                }
                PeerAddress::Tcp(addr) => {
                    info!("Opening TCP bridge to {}", addr);
                    let stream = TcpStream::connect(addr.as_str()).await?;
                    stream.set_nodelay(true)?;
                    Ok(Box::new(stream) as Box<dyn ByteStream>)
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfcomm_peer_parse() {
        let peer = Peer::rfcomm("HC-05", "00:21:13:01:AB:CD", 1).unwrap();
        assert_eq!(peer.to_string(), "HC-05 (rfcomm://00:21:13:01:AB:CD/1)");
    }

    #[test]
    fn test_rfcomm_peer_rejects_bad_address() {
        assert!(Peer::rfcomm("bad", "not-an-address", 1).is_err());
    }

    #[test]
    fn test_tcp_peer_display() {
        let peer = Peer::tcp("bridge", "127.0.0.1:7000");
        assert_eq!(peer.address.to_string(), "tcp://127.0.0.1:7000");
    }
}
