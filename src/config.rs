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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::{Peer, SessionConfig, DEFAULT_RFCOMM_CHANNEL};
use crate::protocol::OverflowPolicy;

const APP_DIR: &str = "security-remote";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller to connect to.
    pub peer: PeerConfig,

    /// Session settings.
    pub session: SessionSettings,

    /// Display settings.
    pub display: DisplayConfig,
}

/// Transport used to reach the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Rfcomm,
    Tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Display name of the controller.
    pub name: String,

    pub transport: TransportKind,

    /// Bluetooth address (`00:11:22:33:44:55`) or TCP `host:port`.
    /// Empty until a device has been chosen.
    pub address: String,

    /// RFCOMM channel, ignored for TCP.
    pub channel: u8,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            name: "Security Controller".to_string(),
            transport: TransportKind::Rfcomm,
            address: String::new(),
            channel: DEFAULT_RFCOMM_CHANNEL,
        }
    }
}

impl PeerConfig {
    /// Resolve the configured peer, if an address is set.
    pub fn to_peer(&self) -> Result<Option<Peer>> {
        if self.address.trim().is_empty() {
            return Ok(None);
        }

        let peer = match self.transport {
            TransportKind::Rfcomm => Peer::rfcomm(&self.name, self.address.trim(), self.channel)?,
            TransportKind::Tcp => Peer::tcp(&self.name, self.address.trim()),
        };
        Ok(Some(peer))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-command write timeout in milliseconds.
    pub write_timeout_ms: u64,

    /// Maximum bytes per socket read.
    pub read_chunk_size: usize,

    /// Longest accepted status line in bytes.
    pub frame_capacity: usize,

    /// "truncate" or "fail".
    pub overflow_policy: OverflowPolicy,

    /// Strip the `\r` of CRLF line endings.
    pub trim_carriage_return: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            connect_timeout_ms: millis(defaults.connect_timeout),
            write_timeout_ms: millis(defaults.write_timeout),
            read_chunk_size: defaults.read_chunk_size,
            frame_capacity: defaults.frame_capacity,
            overflow_policy: defaults.overflow_policy,
            trim_carriage_return: defaults.trim_carriage_return,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl SessionSettings {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
            read_chunk_size: self.read_chunk_size,
            frame_capacity: self.frame_capacity,
            overflow_policy: self.overflow_policy,
            trim_carriage_return: self.trim_carriage_return,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum number of notifications kept on screen.
    pub max_notifications: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_notifications: 100,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load configuration from the default location or create it.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.session.frame_capacity == 0 {
            bail!("session.frame_capacity must be greater than zero");
        }
        if self.session.read_chunk_size == 0 {
            bail!("session.read_chunk_size must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::PeerAddress;
    use tempfile::TempDir;

    #[test]
    fn test_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.session.frame_capacity, 1024);
        assert_eq!(config.session.overflow_policy, OverflowPolicy::Truncate);
        assert!(config.session.trim_carriage_return);
        assert!(config.peer.to_peer().unwrap().is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[peer]
transport = "tcp"
address = "127.0.0.1:7000"

[session]
overflow_policy = "fail"
connect_timeout_ms = 250
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let session = config.session.to_session_config();
        assert_eq!(session.connect_timeout, Duration::from_millis(250));
        assert_eq!(session.overflow_policy, OverflowPolicy::Fail);
        assert_eq!(config.display.max_notifications, 100);

        let peer = config.peer.to_peer().unwrap().unwrap();
        assert_eq!(peer.address, PeerAddress::Tcp("127.0.0.1:7000".to_string()));
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(250)), 250);
        assert_eq!(millis(Duration::MAX), u64::MAX);
        assert_eq!(SessionSettings::default().write_timeout_ms, 5000);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nframe_capacity = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_roundtrip_keeps_peer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.peer.address = "00:21:13:01:AB:CD".to_string();
        config.peer.channel = 2;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        let peer = loaded.peer.to_peer().unwrap().unwrap();
        assert!(matches!(peer.address, PeerAddress::Rfcomm { channel: 2, .. }));
    }
}
