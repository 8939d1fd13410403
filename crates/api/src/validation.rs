// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request validation that needs more than the domain rules.

use helpdesk_domain::MAX_PERSON_LEN;
use thiserror::Error;

/// Ticket request errors caught at the API boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketValidationError {
    /// The area exists but no longer accepts tickets.
    #[error("Area {area_id} is not accepting new tickets")]
    AreaInactive { area_id: i64 },

    /// An assignee was given but is blank.
    #[error("Assignee cannot be blank; omit it to unassign")]
    BlankAssignee,

    /// The assignee does not fit the stored identity width.
    #[error("Assignee cannot exceed {max} characters")]
    AssigneeTooLong { max: usize },

    /// The partition filter is not a valid partition key.
    #[error("Invalid partition '{value}'")]
    InvalidPartition { value: String },
}

impl TicketValidationError {
    /// Returns the request field this error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::AreaInactive { .. } => "area_id",
            Self::BlankAssignee | Self::AssigneeTooLong { .. } => "assignee",
            Self::InvalidPartition { .. } => "partition",
        }
    }
}

/// Normalizes an optional assignee: trims it and rejects blanks.
///
/// # Errors
///
/// Returns `BlankAssignee` for an empty or whitespace-only value and
/// `AssigneeTooLong` for one longer than 255 characters.
pub fn normalize_assignee(assignee: Option<&str>) -> Result<Option<String>, TicketValidationError> {
    match assignee.map(str::trim) {
        None => Ok(None),
        Some("") => Err(TicketValidationError::BlankAssignee),
        Some(name) if name.chars().count() > MAX_PERSON_LEN => {
            Err(TicketValidationError::AssigneeTooLong {
                max: MAX_PERSON_LEN,
            })
        }
        Some(name) => Ok(Some(name.to_string())),
    }
}
