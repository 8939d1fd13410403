// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ticket::{
    MAX_AREA_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_PERSON_LEN, MAX_TITLE_LEN, NewTicket,
};

/// Validates the field constraints of a ticket about to be filed.
///
/// This does NOT check that the area exists; the database enforces that.
///
/// # Errors
///
/// Returns an error if:
/// - The title is empty or longer than 200 characters
/// - The description is longer than 10 000 characters
/// - The requester is empty or longer than 255 characters
pub fn validate_new_ticket(ticket: &NewTicket) -> Result<(), DomainError> {
    if ticket.title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    if ticket.title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::InvalidTitle(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }

    if ticket.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::InvalidDescription(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }

    if ticket.requester.trim().is_empty() {
        return Err(DomainError::InvalidRequester(String::from(
            "Requester cannot be empty",
        )));
    }

    if ticket.requester.chars().count() > MAX_PERSON_LEN {
        return Err(DomainError::InvalidRequester(format!(
            "Requester cannot exceed {MAX_PERSON_LEN} characters"
        )));
    }

    Ok(())
}

/// Validates the name of an attention area.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than 80 characters.
pub fn validate_area_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidAreaName(String::from(
            "Area name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_AREA_NAME_LEN {
        return Err(DomainError::InvalidAreaName(format!(
            "Area name cannot exceed {MAX_AREA_NAME_LEN} characters"
        )));
    }
    Ok(())
}
