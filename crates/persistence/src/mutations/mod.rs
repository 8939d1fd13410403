// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! - `tickets`: ticket row insert, soft delete, status and assignee updates
//! - `areas`: attention area creation and activation
//!
//! Ticket creation itself goes through `crate::allocator`, which wraps the
//! row insert in the code allocation transaction.

pub mod areas;
pub mod tickets;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Returns the current UTC time formatted for storage.
///
/// Timestamps are stored as RFC 3339 text on every backend.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn current_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}
