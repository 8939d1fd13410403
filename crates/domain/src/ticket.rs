// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of a ticket title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a ticket description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Maximum length of an attention area name, in characters.
pub const MAX_AREA_NAME_LEN: usize = 80;

/// Maximum length of a requester or assignee identity, in characters.
pub const MAX_PERSON_LEN: usize = 255;

/// How urgently a ticket needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Converts this priority to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a ticket is in its triage lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Filed and waiting for an agent.
    #[default]
    Open,
    /// An agent is working on it.
    InProgress,
    /// A fix or answer was provided.
    Resolved,
    /// No further work will happen.
    Closed,
}

impl TicketStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Open` → `InProgress`, `Resolved`, `Closed`
    /// - `InProgress` → `Open`, `Resolved`, `Closed`
    /// - `Resolved` → `Open`, `Closed`
    /// - `Closed` → `Open`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::InProgress | Self::Resolved | Self::Closed)
                | (Self::InProgress, Self::Open | Self::Resolved | Self::Closed)
                | (Self::Resolved, Self::Open | Self::Closed)
                | (Self::Closed, Self::Open)
        )
    }

    /// Returns an error unless moving to `target` is allowed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` for forbidden moves.
    pub fn ensure_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of a ticket that is about to be filed.
///
/// Everything except the code, which is assigned at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// One-line summary.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// How urgent the request is.
    pub priority: Priority,
    /// The attention area the ticket is filed under.
    pub area_id: i64,
    /// Identity of the person filing the ticket.
    pub requester: String,
}

impl NewTicket {
    /// Creates a new ticket with trimmed title and requester.
    #[must_use]
    pub fn new(
        title: &str,
        description: &str,
        priority: Priority,
        area_id: i64,
        requester: &str,
    ) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.to_string(),
            priority,
            area_id,
            requester: requester.trim().to_string(),
        }
    }
}
