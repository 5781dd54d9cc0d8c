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

//! Application state management.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::connection::ConnectionState;

/// A received `[ALERT]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub received_at: DateTime<Local>,
    pub text: String,
}

/// What the front-end shows: connection status, the latest status line of
/// each kind and recent notifications.
#[derive(Debug)]
pub struct AppState {
    /// Current connection status.
    pub connection_status: RwLock<ConnectionState>,

    /// Connected controller name.
    pub connected_device: RwLock<Option<String>>,

    pub alarm_status: RwLock<Option<String>>,
    pub door_status: RwLock<Option<String>>,
    pub alert_status: RwLock<Option<String>>,

    /// Newest first.
    pub notifications: RwLock<VecDeque<Notification>>,

    /// Last connection error, cleared on connect.
    pub last_error: RwLock<Option<String>>,

    max_notifications: usize,
}

impl AppState {
    pub fn new(max_notifications: usize) -> Arc<Self> {
        Arc::new(Self {
            connection_status: RwLock::new(ConnectionState::Disconnected),
            connected_device: RwLock::new(None),
            alarm_status: RwLock::new(None),
            door_status: RwLock::new(None),
            alert_status: RwLock::new(None),
            notifications: RwLock::new(VecDeque::new()),
            last_error: RwLock::new(None),
            max_notifications,
        })
    }

    pub fn set_status(&self, status: ConnectionState) {
        *self.connection_status.write() = status;
        match status {
            ConnectionState::Connected => *self.last_error.write() = None,
            ConnectionState::Disconnected => *self.connected_device.write() = None,
            _ => {}
        }
    }

    pub fn set_device_name(&self, name: String) {
        *self.connected_device.write() = Some(name);
    }

    pub fn set_error(&self, error: String) {
        *self.last_error.write() = Some(error);
    }

    pub fn get_status(&self) -> ConnectionState {
        *self.connection_status.read()
    }

    pub fn get_device_name(&self) -> Option<String> {
        self.connected_device.read().clone()
    }

    pub fn get_last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    pub fn set_alarm_status(&self, text: String) {
        *self.alarm_status.write() = Some(text);
    }

    pub fn set_door_status(&self, text: String) {
        *self.door_status.write() = Some(text);
    }

    pub fn set_alert_status(&self, text: String) {
        *self.alert_status.write() = Some(text);
    }

    pub fn get_alarm_status(&self) -> Option<String> {
        self.alarm_status.read().clone()
    }

    pub fn get_door_status(&self) -> Option<String> {
        self.door_status.read().clone()
    }

    pub fn get_alert_status(&self) -> Option<String> {
        self.alert_status.read().clone()
    }

    /// Add a notification at the front, dropping the oldest past the limit.
    pub fn push_notification(&self, text: String) {
        let mut list = self.notifications.write();
        list.push_front(Notification {
            received_at: Local::now(),
            text,
        });
        list.truncate(self.max_notifications);
    }

    pub fn get_notifications(&self) -> Vec<Notification> {
        self.notifications.read().iter().cloned().collect()
    }
}
