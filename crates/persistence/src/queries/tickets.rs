// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;

use crate::data_models::TicketRow;
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;

backend_fn! {
/// Loads every ticket code starting with `prefix`.
///
/// Soft-deleted tickets are included: their codes stay issued and must
/// count toward the partition's high-water mark.
///
/// The prefix must not contain `LIKE` wildcards; partition keys are
/// restricted to ASCII letters and digits, which guarantees that.
///
/// # Errors
///
/// Returns the raw Diesel error so the caller can classify it.
pub fn issued_codes_with_prefix(conn: &mut _, prefix: &str) -> QueryResult<Vec<String>> {
    tickets::table
        .filter(tickets::code.like(format!("{prefix}%")))
        .select(tickets::code)
        .load::<String>(conn)
}
}

backend_fn! {
/// Looks up the surrogate id of the ticket holding `code`.
///
/// # Errors
///
/// Returns the raw Diesel error, including `NotFound`.
pub fn ticket_id_for_code(conn: &mut _, code: &str) -> QueryResult<i64> {
    tickets::table
        .filter(tickets::code.eq(code))
        .select(tickets::ticket_id)
        .first::<i64>(conn)
}
}

backend_fn! {
/// Retrieves a ticket by code, deleted or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_ticket_by_code(conn: &mut _, code: &str) -> Result<Option<TicketRow>, PersistenceError> {
    tickets::table
        .filter(tickets::code.eq(code))
        .select(TicketRow::as_select())
        .first::<TicketRow>(conn)
        .optional()
        .map_err(Into::into)
}
}

backend_fn! {
/// Retrieves a ticket by surrogate id, deleted or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_ticket_by_id(conn: &mut _, ticket_id: i64) -> Result<Option<TicketRow>, PersistenceError> {
    tickets::table
        .filter(tickets::ticket_id.eq(ticket_id))
        .select(TicketRow::as_select())
        .first::<TicketRow>(conn)
        .optional()
        .map_err(Into::into)
}
}

backend_fn! {
/// Lists tickets in allocation order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `prefix` - Only return codes starting with this prefix, if set
/// * `include_deleted` - Whether soft-deleted tickets are returned
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets(
    conn: &mut _,
    prefix: Option<&str>,
    include_deleted: bool,
) -> Result<Vec<TicketRow>, PersistenceError> {
    let mut query = tickets::table
        .select(TicketRow::as_select())
        .order(tickets::ticket_id.asc())
        .into_boxed();

    if let Some(prefix) = prefix {
        query = query.filter(tickets::code.like(format!("{prefix}%")));
    }
    if !include_deleted {
        query = query.filter(tickets::deleted_at.is_null());
    }

    query.load::<TicketRow>(conn).map_err(Into::into)
}
}

backend_fn! {
/// Counts tickets.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tickets(conn: &mut _, include_deleted: bool) -> Result<usize, PersistenceError> {
    let count: i64 = if include_deleted {
        tickets::table.count().get_result(conn)?
    } else {
        tickets::table
            .filter(tickets::deleted_at.is_null())
            .count()
            .get_result(conn)?
    };

    count
        .to_usize()
        .ok_or_else(|| PersistenceError::Other(format!("Invalid ticket count: {count}")))
}
}
