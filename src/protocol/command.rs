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

//! Outbound controller commands and their wire encoding.
//!
//! Every command is a single UTF-8 text line terminated by `\n`. Payloads are
//! not escaped: a password containing `\n` splits into two lines on the
//! controller side. Callers that accept free text are responsible for it.

use std::fmt;

use super::error::ProtocolError;
use super::framer::LINE_DELIMITER;

/// Prefix of the password command.
pub const PASSWORD_PREFIX: &str = "PASSWORD:";

/// A user command for the controller.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// Request a full status report.
    Status,
    /// Arm the alarm.
    Arm,
    /// Disarm the alarm.
    Disarm,
    /// Lock the door.
    Lock,
    /// Unlock the door.
    Unlock,
    /// Silence a sounding alarm.
    StopAlarm,
    /// Send the door password.
    SetPassword(String),
}

impl Command {
    /// Build a password command, rejecting an empty secret.
    pub fn set_password(secret: impl Into<String>) -> Result<Self, ProtocolError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ProtocolError::EmptyPassword);
        }
        Ok(Self::SetPassword(secret))
    }

    /// Parse a user-typed command word.
    ///
    /// `password <secret>` keeps the secret verbatim after the first space.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (word, rest) = match s.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (s, ""),
        };

        match word.to_uppercase().as_str() {
            "STATUS" => Some(Self::Status),
            "ARM" => Some(Self::Arm),
            "DISARM" => Some(Self::Disarm),
            "LOCK" => Some(Self::Lock),
            "UNLOCK" => Some(Self::Unlock),
            "STOP" => Some(Self::StopAlarm),
            "PASSWORD" => Self::set_password(rest).ok(),
            _ => None,
        }
    }

    /// Wire keyword, without payload or delimiter.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::Arm => "ARM",
            Self::Disarm => "DISARM",
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
            Self::StopAlarm => "STOP",
            Self::SetPassword(_) => "PASSWORD",
        }
    }
}

// Keeps secrets out of logs.
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPassword(_) => f.write_str("SetPassword(***)"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// Encode a command into its wire bytes.
pub fn encode(command: &Command) -> Vec<u8> {
    let mut bytes = match command {
        Command::SetPassword(secret) => {
            let mut b = Vec::with_capacity(PASSWORD_PREFIX.len() + secret.len() + 1);
            b.extend_from_slice(PASSWORD_PREFIX.as_bytes());
            b.extend_from_slice(secret.as_bytes());
            b
        }
        other => other.keyword().as_bytes().to_vec(),
    };
    bytes.push(LINE_DELIMITER);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_table() {
        assert_eq!(encode(&Command::Status), b"STATUS\n");
        assert_eq!(encode(&Command::Arm), b"ARM\n");
        assert_eq!(encode(&Command::Disarm), b"DISARM\n");
        assert_eq!(encode(&Command::Lock), b"LOCK\n");
        assert_eq!(encode(&Command::Unlock), b"UNLOCK\n");
        assert_eq!(encode(&Command::StopAlarm), b"STOP\n");
    }

    #[test]
    fn test_encode_password() {
        let cmd = Command::set_password("1234").unwrap();
        assert_eq!(encode(&cmd), b"PASSWORD:1234\n");
    }

    #[test]
    fn test_encode_password_not_escaped() {
        let cmd = Command::SetPassword("12\n34".to_string());
        assert_eq!(encode(&cmd), b"PASSWORD:12\n34\n");
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(Command::set_password(""), Err(ProtocolError::EmptyPassword));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("status"), Some(Command::Status));
        assert_eq!(Command::parse("ARM"), Some(Command::Arm));
        assert_eq!(Command::parse(" disarm "), Some(Command::Disarm));
        assert_eq!(Command::parse("Lock"), Some(Command::Lock));
        assert_eq!(Command::parse("unlock"), Some(Command::Unlock));
        assert_eq!(Command::parse("stop"), Some(Command::StopAlarm));
        assert_eq!(
            Command::parse("password 12 34"),
            Some(Command::SetPassword("12 34".to_string()))
        );
        assert_eq!(Command::parse("password"), None);
        assert_eq!(Command::parse("open sesame"), None);
    }

    #[test]
    fn test_debug_hides_secret() {
        let cmd = Command::SetPassword("hunter2".to_string());
        assert_eq!(format!("{:?}", cmd), "SetPassword(***)");
        assert_eq!(format!("{:?}", Command::Arm), "ARM");
    }
}
