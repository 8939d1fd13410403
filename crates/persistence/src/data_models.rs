// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use helpdesk_domain::{Priority, TicketCode, TicketStatus};
use serde::{Deserialize, Serialize};

use crate::diesel_schema::{areas, tickets};
use crate::error::PersistenceError;

/// The result of a successful allocation: the stored ticket's id and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedTicket {
    /// The surrogate key assigned by the database.
    pub ticket_id: i64,
    /// The human-readable code assigned by the allocator.
    pub code: TicketCode,
}

/// Insertable ticket row.
#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub area_id: i64,
    pub requester: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Raw ticket row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
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
    pub deleted_at: Option<String>,
}

/// A stored ticket with its text columns parsed into domain values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketData {
    pub ticket_id: i64,
    pub code: TicketCode,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub area_id: i64,
    pub requester: String,
    pub assignee: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Set when the ticket was deleted. The code stays reserved.
    pub deleted_at: Option<String>,
}

impl TicketData {
    /// Returns whether the ticket has been deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl TryFrom<TicketRow> for TicketData {
    type Error = PersistenceError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, err: &dyn std::fmt::Display| {
            PersistenceError::CorruptRecord(format!(
                "ticket {} has invalid {field}: {err}",
                row.ticket_id
            ))
        };

        let code: TicketCode = row.code.parse().map_err(|e| corrupt("code", &e))?;
        let priority: Priority = row.priority.parse().map_err(|e| corrupt("priority", &e))?;
        let status: TicketStatus = row.status.parse().map_err(|e| corrupt("status", &e))?;

        Ok(Self {
            ticket_id: row.ticket_id,
            code,
            title: row.title,
            description: row.description,
            priority,
            status,
            area_id: row.area_id,
            requester: row.requester,
            assignee: row.assignee,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Raw area row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = areas)]
pub struct AreaRow {
    pub area_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: i32,
    pub created_at: String,
}

/// An attention area that tickets are triaged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaData {
    pub area_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<AreaRow> for AreaData {
    fn from(row: AreaRow) -> Self {
        Self {
            area_id: row.area_id,
            name: row.name,
            description: row.description,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        }
    }
}
