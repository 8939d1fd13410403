// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket mutations.
//!
//! Codes are never updated or removed here. Deletion is a soft delete so
//! the code stays visible to the allocator's scan and is never reissued.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::data_models::NewTicketRow;
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a ticket row carrying an already-chosen code.
///
/// Only the allocator calls this, inside its write transaction.
///
/// # Errors
///
/// Returns the raw Diesel error so a unique violation on the code can be
/// told apart from every other failure.
pub fn insert_ticket_row(conn: &mut _, row: &NewTicketRow<'_>) -> QueryResult<usize> {
    diesel::insert_into(tickets::table).values(row).execute(conn)
}
}

backend_fn! {
/// Marks a ticket as deleted.
///
/// # Errors
///
/// Returns `TicketNotFound` if no live ticket has this code.
pub fn soft_delete_ticket(conn: &mut _, code: &str, deleted_at: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(tickets::table)
        .filter(tickets::code.eq(code))
        .filter(tickets::deleted_at.is_null())
        .set((
            tickets::deleted_at.eq(Some(deleted_at)),
            tickets::updated_at.eq(deleted_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::TicketNotFound(code.to_string()));
    }

    info!(code, "Soft-deleted ticket");
    Ok(())
}
}

backend_fn! {
/// Moves a live ticket from `from` to `to`.
///
/// Transition rules are checked by the caller against `from`. The update
/// only matches while the stored status is still `from`, so a concurrent
/// change between the caller's read and this write is detected rather than
/// overwritten.
///
/// # Errors
///
/// Returns `TicketNotFound` if no live ticket has this code, or
/// `StatusChanged` if its status is no longer `from`.
pub fn update_ticket_status(
    conn: &mut _,
    code: &str,
    from: &str,
    to: &str,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(tickets::table)
        .filter(tickets::code.eq(code))
        .filter(tickets::deleted_at.is_null())
        .filter(tickets::status.eq(from))
        .set((
            tickets::status.eq(to),
            tickets::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        let stored: Option<String> = tickets::table
            .filter(tickets::code.eq(code))
            .filter(tickets::deleted_at.is_null())
            .select(tickets::status)
            .first::<String>(conn)
            .optional()?;

        return Err(match stored {
            Some(actual) => PersistenceError::StatusChanged {
                code: code.to_string(),
                expected: from.to_string(),
                actual,
            },
            None => PersistenceError::TicketNotFound(code.to_string()),
        });
    }

    debug!(code, from, to, "Updated ticket status");
    Ok(())
}
}

backend_fn! {
/// Assigns a live ticket to an agent, or clears the assignee with `None`.
///
/// # Errors
///
/// Returns `TicketNotFound` if no live ticket has this code.
pub fn assign_ticket(
    conn: &mut _,
    code: &str,
    assignee: Option<&str>,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(tickets::table)
        .filter(tickets::code.eq(code))
        .filter(tickets::deleted_at.is_null())
        .set((
            tickets::assignee.eq(assignee),
            tickets::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::TicketNotFound(code.to_string()));
    }

    debug!(code, ?assignee, "Updated ticket assignee");
    Ok(())
}
}
