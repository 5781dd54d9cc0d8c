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

//! Applies session updates to the application state.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::connection::{ConnectionState, SessionUpdate};
use crate::protocol::Event;
use crate::state::AppState;

/// Consumes [`SessionUpdate`]s on the presentation task.
pub struct EventProcessor {
    state: Arc<AppState>,
}

impl EventProcessor {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Process a single update.
    pub fn process(&self, update: SessionUpdate) {
        match update {
            SessionUpdate::Event(event) => self.handle_event(event),
            SessionUpdate::State(status) => {
                info!("Connection status: {}", status.as_str());
                self.state.set_status(status);
            }
            SessionUpdate::Peer(name) => {
                info!("Controller: {}", name);
                self.state.set_device_name(name);
            }
            SessionUpdate::Error(e) => {
                error!("Connection error: {}", e);
                self.state.set_error(e.to_string());
            }
        }
    }

    fn handle_event(&self, event: Event) {
        match event {
            Event::AlarmStatus(text) => {
                info!("{}", text);
                self.state.set_alarm_status(text);
            }
            Event::DoorStatus(text) => {
                info!("{}", text);
                self.state.set_door_status(text);
            }
            Event::AlertStatus(text) => {
                info!("{}", text);
                self.state.set_alert_status(text);
            }
            Event::Notification(text) => {
                info!("Notification: {}", text);
                self.state.push_notification(text);
            }
            Event::Unclassified(text) => {
                debug!("Ignoring unrecognized line: {}", text);
            }
        }
    }

    pub fn status(&self) -> ConnectionState {
        self.state.get_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SessionError;

    #[test]
    fn test_status_lines_update_fields() {
        let state = AppState::new(10);
        let processor = EventProcessor::new(state.clone());

        processor.process(SessionUpdate::Event(Event::AlarmStatus("Alarm: Armed".into())));
        processor.process(SessionUpdate::Event(Event::DoorStatus("Door: Locked".into())));
        processor.process(SessionUpdate::Event(Event::AlertStatus("Alert: Off".into())));
        processor.process(SessionUpdate::Event(Event::AlarmStatus("Alarm: Disarmed".into())));

        assert_eq!(state.get_alarm_status().as_deref(), Some("Alarm: Disarmed"));
        assert_eq!(state.get_door_status().as_deref(), Some("Door: Locked"));
        assert_eq!(state.get_alert_status().as_deref(), Some("Alert: Off"));
    }

    #[test]
    fn test_unclassified_is_ignored() {
        let state = AppState::new(10);
        let processor = EventProcessor::new(state.clone());

        processor.process(SessionUpdate::Event(Event::Unclassified("Foo: bar".into())));

        assert!(state.get_alarm_status().is_none());
        assert!(state.get_notifications().is_empty());
    }

    #[test]
    fn test_state_and_error_updates() {
        let state = AppState::new(10);
        let processor = EventProcessor::new(state.clone());

        processor.process(SessionUpdate::State(ConnectionState::Failed));
        processor.process(SessionUpdate::Error(SessionError::ReadFailed("reset".into())));

        assert_eq!(processor.status(), ConnectionState::Failed);
        assert_eq!(state.get_last_error().as_deref(), Some("read failed: reset"));
    }

    #[test]
    fn test_reconnect_keeps_new_device_name() {
        let state = AppState::new(10);
        let processor = EventProcessor::new(state.clone());

        // A disconnect still queued when the next connect lands
        processor.process(SessionUpdate::Peer("Old".into()));
        processor.process(SessionUpdate::State(ConnectionState::Connected));
        processor.process(SessionUpdate::State(ConnectionState::Disconnected));
        processor.process(SessionUpdate::State(ConnectionState::Connecting));
        processor.process(SessionUpdate::Peer("HC-05".into()));
        processor.process(SessionUpdate::State(ConnectionState::Connected));

        assert_eq!(state.get_device_name().as_deref(), Some("HC-05"));
        assert_eq!(processor.status(), ConnectionState::Connected);
    }

    #[test]
    fn test_notifications_collected() {
        let state = AppState::new(10);
        let processor = EventProcessor::new(state.clone());

        processor.process(SessionUpdate::Event(Event::Notification("[ALERT] Motion detected".into())));

        let list = state.get_notifications();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].text, "[ALERT] Motion detected");
    }
}
