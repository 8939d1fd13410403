// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound ticket notifications.
//!
//! Delivery (email, chat) happens outside this system. Handlers hand a
//! structured message to a [`Notifier`] after the change is committed and
//! never fail a request because delivery failed.

use serde::{Deserialize, Serialize};
use tracing::info;

/// What happened to the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Created,
    StatusChanged,
    Assigned,
    Deleted,
}

/// A message about a committed ticket change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketNotification {
    pub kind: NotificationKind,
    /// The stored ticket code.
    pub code: String,
    pub title: String,
    pub requester: String,
    pub assignee: Option<String>,
    pub status: String,
    /// Who made the change.
    pub actor: String,
}

/// Notification delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError {
    /// Why delivery failed.
    pub reason: String,
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification failed: {}", self.reason)
    }
}

impl std::error::Error for NotifyError {}

/// Fire-and-forget delivery of ticket notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed off.
    fn notify(&self, notification: &TicketNotification) -> Result<(), NotifyError>;
}

/// Writes each notification as a JSON log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &TicketNotification) -> Result<(), NotifyError> {
        let payload: String = serde_json::to_string(notification).map_err(|e| NotifyError {
            reason: e.to_string(),
        })?;
        info!(
            code = %notification.code,
            kind = ?notification.kind,
            %payload,
            "Ticket notification"
        );
        Ok(())
    }
}
