//! In-process notification center for form submission outcomes.
//!
//! A [`NotificationManager`] is created once at startup and shared with
//! handlers through `web::Data`. Each notification gets its own id so callers
//! can dismiss exactly the message they raised.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity used by the UI to pick a colour.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: NaiveDateTime,
}

/// Upper bound on retained notifications; the oldest are dropped first.
const MAX_ACTIVE: usize = 50;

#[derive(Clone, Debug, Default)]
pub struct NotificationManager {
    active: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a notification and returns the handle used to dismiss it.
    pub fn notify(&self, level: Level, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now().naive_utc(),
        };
        let id = notification.id;

        let mut active = self.active.lock();
        active.push(notification);
        if active.len() > MAX_ACTIVE {
            let overflow = active.len() - MAX_ACTIVE;
            active.drain(..overflow);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(Level::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(Level::Error, message)
    }

    /// Removes the notification with `id`. Returns `false` when it was
    /// already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }

    /// Snapshot of the active notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active.lock().clone()
    }

    pub fn clear(&self) {
        self.active.lock().clear();
    }
}
