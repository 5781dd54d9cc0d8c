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

//! Classification of controller status lines.

use tracing::debug;

use super::framer::Line;

/// Prefix of alarm state lines.
pub const ALARM_PREFIX: &str = "Alarm:";
/// Prefix of door lock state lines.
pub const DOOR_PREFIX: &str = "Door:";
/// Prefix of motion alert state lines.
pub const ALERT_PREFIX: &str = "Alert:";
/// Prefix of one-shot notifications.
pub const NOTIFICATION_PREFIX: &str = "[ALERT]";

/// Event kinds, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AlarmStatus,
    DoorStatus,
    AlertStatus,
    Notification,
    Unclassified,
}

/// A decoded line from the controller.
///
/// The payload is the full line text, prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `Alarm: ...`
    AlarmStatus(String),
    /// `Door: ...`
    DoorStatus(String),
    /// `Alert: ...`
    AlertStatus(String),
    /// `[ALERT] ...`
    Notification(String),
    /// Anything else.
    Unclassified(String),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AlarmStatus(_) => EventKind::AlarmStatus,
            Self::DoorStatus(_) => EventKind::DoorStatus,
            Self::AlertStatus(_) => EventKind::AlertStatus,
            Self::Notification(_) => EventKind::Notification,
            Self::Unclassified(_) => EventKind::Unclassified,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::AlarmStatus(t)
            | Self::DoorStatus(t)
            | Self::AlertStatus(t)
            | Self::Notification(t)
            | Self::Unclassified(t) => t,
        }
    }
}

/// Classify a framed line.
///
/// Lines that are not valid UTF-8 are surfaced as [`Event::Unclassified`]
/// with a lossy decoding. Returns `None` for blank lines.
pub fn classify(line: &Line) -> Option<Event> {
    match line.text() {
        Ok(text) => classify_text(text),
        Err(e) => {
            debug!("Undecodable line ({}), passing through lossy", e);
            Some(Event::Unclassified(line.to_text_lossy().into_owned()))
        }
    }
}

/// Classify decoded line text.
pub fn classify_text(text: &str) -> Option<Event> {
    if text.trim().is_empty() {
        return None;
    }

    let text = text.to_string();
    let event = if text.starts_with(ALARM_PREFIX) {
        Event::AlarmStatus(text)
    } else if text.starts_with(DOOR_PREFIX) {
        Event::DoorStatus(text)
    } else if text.starts_with(ALERT_PREFIX) {
        Event::AlertStatus(text)
    } else if text.starts_with(NOTIFICATION_PREFIX) {
        Event::Notification(text)
    } else {
        Event::Unclassified(text)
    };

    Some(event)
}
