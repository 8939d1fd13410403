// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use helpdesk_persistence::{AreaData, TicketData};
use serde::{Deserialize, Serialize};

/// API request to file a new ticket.
///
/// The requester is the authenticated actor; the code is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    /// One-line summary.
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// `low`, `normal`, `high` or `urgent`. Defaults to `normal`.
    #[serde(default)]
    pub priority: Option<String>,
    /// The attention area to file under.
    pub area_id: i64,
}

/// API response for a successfully filed ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    /// The stored ticket's surrogate id.
    pub ticket_id: i64,
    /// The code assigned to the ticket.
    pub code: String,
    /// A success message.
    pub message: String,
}

/// A ticket as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInfo {
    pub ticket_id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub area_id: i64,
    pub requester: String,
    pub assignee: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted: bool,
}

impl From<TicketData> for TicketInfo {
    fn from(ticket: TicketData) -> Self {
        let deleted: bool = ticket.is_deleted();
        Self {
            ticket_id: ticket.ticket_id,
            code: ticket.code.to_string(),
            title: ticket.title,
            description: ticket.description,
            priority: ticket.priority.to_string(),
            status: ticket.status.to_string(),
            area_id: ticket.area_id,
            requester: ticket.requester,
            assignee: ticket.assignee,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            deleted,
        }
    }
}

/// API request to list tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsRequest {
    /// Only tickets whose code is in this partition (e.g. `2026`).
    #[serde(default)]
    pub partition: Option<String>,
    /// Include soft-deleted tickets. Admin only.
    #[serde(default)]
    pub include_deleted: bool,
}

/// API response listing tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketInfo>,
}

/// API request to move a ticket to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// `open`, `in_progress`, `resolved` or `closed`.
    pub status: String,
}

/// API request to set or clear a ticket's assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    /// The agent to assign, or `None` to unassign.
    #[serde(default)]
    pub assignee: Option<String>,
}

/// API response for a deleted ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTicketResponse {
    /// The deleted ticket's code. It will not be issued again.
    pub code: String,
    /// A success message.
    pub message: String,
}

/// API request to create an attention area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAreaRequest {
    /// The unique area name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// API request to open or close an area for new tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAreaActiveRequest {
    pub active: bool,
}

/// An attention area as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInfo {
    pub area_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<AreaData> for AreaInfo {
    fn from(area: AreaData) -> Self {
        Self {
            area_id: area.area_id,
            name: area.name,
            description: area.description,
            is_active: area.is_active,
            created_at: area.created_at,
        }
    }
}

/// API response listing areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAreasResponse {
    pub areas: Vec<AreaInfo>,
}
