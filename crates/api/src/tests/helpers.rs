// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use helpdesk_domain::PartitionKey;
use helpdesk_persistence::Persistence;

use crate::{
    AuthenticatedActor, CreateTicketRequest, Notifier, NotifyError, Role, TicketNotification,
};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn create_test_agent() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("agent-7"), Role::Agent)
}

pub fn create_test_requester() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("jdoe"), Role::Requester)
}

pub fn create_other_requester() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("asmith"), Role::Requester)
}

pub fn partition_2026() -> PartitionKey {
    PartitionKey::for_year(2026).unwrap()
}

/// Returns an in-memory persistence with one active area, and that area's id.
pub fn setup_persistence() -> (Persistence, i64) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let area_id = persistence
        .create_area("Service Desk", None)
        .unwrap()
        .area_id;
    (persistence, area_id)
}

pub fn ticket_request(area_id: i64) -> CreateTicketRequest {
    CreateTicketRequest {
        title: String::from("Laptop will not boot"),
        description: String::from("Stuck on the vendor logo since this morning."),
        priority: Some(String::from("high")),
        area_id,
    }
}

/// Keeps every notification it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<TicketNotification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<TicketNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &TicketNotification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Rejects every notification.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &TicketNotification) -> Result<(), NotifyError> {
        Err(NotifyError {
            reason: String::from("mail relay unreachable"),
        })
    }
}
