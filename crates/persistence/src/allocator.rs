// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sequential ticket code allocation.
//!
//! A ticket code is `<partition>-<sequence>`. Allocating one is a single
//! unit of work:
//!
//! 1. open a write transaction
//! 2. confirm the ticket's area still accepts tickets
//! 3. scan every issued code in the partition (soft-deleted tickets included)
//!    and take the numeric maximum of the sequences
//! 4. insert the ticket with `max + 1`
//! 5. commit
//!
//! The unique constraint on `tickets.code` is what actually prevents two
//! tickets from sharing a code. When a concurrent writer wins the race the
//! insert (or the commit) fails with a unique violation on that constraint,
//! the transaction rolls back, and the whole unit is retried with a fresh
//! scan. Any other failure is returned to the caller untouched.
//!
//! The number of attempts is bounded by [`AllocationPolicy`]. Running out
//! of attempts yields [`PersistenceError::AllocationExhausted`] and leaves
//! nothing behind.

use std::num::NonZeroU32;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{MysqlConnection, QueryResult, SqliteConnection};
use helpdesk_domain::{NewTicket, PartitionKey, TicketCode, TicketStatus, max_issued_sequence};
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{AllocatedTicket, NewTicketRow};
use crate::error::PersistenceError;
use crate::mutations::{current_timestamp, tickets as ticket_mutations};
use crate::queries::{areas as area_queries, tickets as ticket_queries};

/// Name of the unique constraint guarding ticket codes.
const CODE_CONSTRAINT: &str = "uq_tickets_code";

/// How `SQLite` names the code column in unique violation messages.
const SQLITE_CODE_COLUMN: &str = "tickets.code";

/// Bounds the retry loop of a single allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    max_attempts: NonZeroU32,
}

impl AllocationPolicy {
    /// Attempts made when nothing else is configured.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Creates a policy allowing `max_attempts` tries per allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Result<Self, PersistenceError> {
        NonZeroU32::new(max_attempts)
            .map(|max_attempts| Self { max_attempts })
            .ok_or_else(|| {
                PersistenceError::InitializationError(String::from(
                    "Allocation policy needs at least one attempt",
                ))
            })
    }

    /// Returns the attempt bound.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::MIN.saturating_add(Self::DEFAULT_MAX_ATTEMPTS - 1),
        }
    }
}

/// The result of one allocation attempt.
#[derive(Debug)]
pub(crate) enum AttemptOutcome<T> {
    /// The transaction committed.
    Committed(T),
    /// The candidate code was taken by a concurrent writer. Retry.
    Conflict,
    /// Anything else. Not retried.
    Failed(PersistenceError),
}

/// Error type used inside an attempt's transaction.
///
/// Keeps a code conflict apart from every other failure until the
/// transaction has been rolled back.
#[derive(Debug)]
enum AttemptError {
    CodeConflict,
    Storage(PersistenceError),
}

impl From<DieselError> for AttemptError {
    fn from(err: DieselError) -> Self {
        if is_code_conflict(&err) {
            Self::CodeConflict
        } else {
            Self::Storage(err.into())
        }
    }
}

impl From<PersistenceError> for AttemptError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(err)
    }
}

fn into_outcome<T>(result: Result<T, AttemptError>) -> AttemptOutcome<T> {
    match result {
        Ok(value) => AttemptOutcome::Committed(value),
        Err(AttemptError::CodeConflict) => AttemptOutcome::Conflict,
        Err(AttemptError::Storage(err)) => AttemptOutcome::Failed(err),
    }
}

/// Returns whether `err` is a unique violation on the ticket code.
///
/// Unique violations on other constraints (area names, for instance) are
/// ordinary storage failures.
fn is_code_conflict(err: &DieselError) -> bool {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = err else {
        return false;
    };

    info.constraint_name()
        .is_some_and(|name| name.contains(CODE_CONSTRAINT))
        || info.message().contains(CODE_CONSTRAINT)
        || info.message().contains(SQLITE_CODE_COLUMN)
}

/// Connection operations the allocator needs, over both backends.
pub(crate) trait TicketStore: PersistenceBackend {
    /// `None` when the area does not exist.
    fn area_accepts_tickets(&mut self, area_id: i64) -> QueryResult<Option<bool>>;

    fn issued_codes(&mut self, prefix: &str) -> QueryResult<Vec<String>>;

    fn insert_ticket(&mut self, row: &NewTicketRow<'_>) -> QueryResult<usize>;
}

impl TicketStore for SqliteConnection {
    fn area_accepts_tickets(&mut self, area_id: i64) -> QueryResult<Option<bool>> {
        area_queries::area_accepts_tickets_sqlite(self, area_id)
    }

    fn issued_codes(&mut self, prefix: &str) -> QueryResult<Vec<String>> {
        ticket_queries::issued_codes_with_prefix_sqlite(self, prefix)
    }

    fn insert_ticket(&mut self, row: &NewTicketRow<'_>) -> QueryResult<usize> {
        ticket_mutations::insert_ticket_row_sqlite(self, row)
    }
}

impl TicketStore for MysqlConnection {
    fn area_accepts_tickets(&mut self, area_id: i64) -> QueryResult<Option<bool>> {
        area_queries::area_accepts_tickets_mysql(self, area_id)
    }

    fn issued_codes(&mut self, prefix: &str) -> QueryResult<Vec<String>> {
        ticket_queries::issued_codes_with_prefix_mysql(self, prefix)
    }

    fn insert_ticket(&mut self, row: &NewTicketRow<'_>) -> QueryResult<usize> {
        ticket_mutations::insert_ticket_row_mysql(self, row)
    }
}

/// Returns the highest sequence issued so far in `partition`.
///
/// Outside a write transaction the answer may be stale by the time it is
/// used.
///
/// # Errors
///
/// Returns an error if the scan fails.
pub(crate) fn high_water_mark<C: TicketStore>(
    conn: &mut C,
    partition: &PartitionKey,
) -> Result<u64, PersistenceError> {
    let issued: Vec<String> = conn.issued_codes(&partition.code_prefix())?;
    Ok(max_issued_sequence(
        partition,
        issued.iter().map(String::as_str),
    ))
}

/// Inserts `ticket` under `code` on an open transaction.
fn insert_candidate<C: TicketStore>(
    conn: &mut C,
    code: &TicketCode,
    ticket: &NewTicket,
) -> Result<AllocatedTicket, AttemptError> {
    let code_text: String = code.to_string();
    let now: String = current_timestamp()?;

    let row = NewTicketRow {
        code: &code_text,
        title: &ticket.title,
        description: &ticket.description,
        priority: ticket.priority.as_str(),
        status: TicketStatus::Open.as_str(),
        area_id: ticket.area_id,
        requester: &ticket.requester,
        created_at: &now,
        updated_at: &now,
    };

    conn.insert_ticket(&row)?;
    let ticket_id: i64 = conn.get_last_insert_rowid()?;

    Ok(AllocatedTicket {
        ticket_id,
        code: code.clone(),
    })
}

/// Runs one scan-and-insert attempt in its own write transaction.
pub(crate) fn attempt_allocation<C: TicketStore>(
    conn: &mut C,
    partition: &PartitionKey,
    ticket: &NewTicket,
) -> AttemptOutcome<AllocatedTicket> {
    let result = conn.write_transaction(|conn| {
        // A missing area is left to the foreign key.
        if conn.area_accepts_tickets(ticket.area_id)? == Some(false) {
            return Err(PersistenceError::AreaInactive(ticket.area_id).into());
        }

        let high_water: u64 = high_water_mark(conn, partition)?;
        let code: TicketCode = TicketCode::next_after(partition.clone(), high_water)
            .map_err(PersistenceError::from)?;

        debug!(
            partition = partition.as_str(),
            high_water,
            candidate = %code,
            "Computed candidate ticket code"
        );

        insert_candidate(conn, &code, ticket)
    });

    into_outcome(result)
}

/// Inserts `ticket` under a code chosen by the caller.
///
/// The code may be stale, which is how tests reproduce a lost race
/// deterministically.
#[cfg(test)]
pub(crate) fn attempt_with_code<C: TicketStore>(
    conn: &mut C,
    code: &TicketCode,
    ticket: &NewTicket,
) -> AttemptOutcome<AllocatedTicket> {
    into_outcome(conn.write_transaction(|conn| insert_candidate(conn, code, ticket)))
}

/// Drives `attempt` until it commits, fails, or the policy runs out.
///
/// `attempt` receives the 1-based attempt number.
///
/// # Errors
///
/// Returns the first non-conflict failure unchanged, or
/// `AllocationExhausted` when every attempt conflicted.
pub(crate) fn run_allocation<T, F>(
    policy: AllocationPolicy,
    partition: &PartitionKey,
    mut attempt: F,
) -> Result<T, PersistenceError>
where
    F: FnMut(u32) -> AttemptOutcome<T>,
{
    let max_attempts: u32 = policy.max_attempts();

    for attempt_number in 1..=max_attempts {
        match attempt(attempt_number) {
            AttemptOutcome::Committed(value) => return Ok(value),
            AttemptOutcome::Conflict => {
                warn!(
                    partition = partition.as_str(),
                    attempt = attempt_number,
                    max_attempts,
                    "Ticket code taken by a concurrent writer"
                );
            }
            AttemptOutcome::Failed(err) => return Err(err),
        }
    }

    warn!(
        partition = partition.as_str(),
        max_attempts, "Ticket code allocation exhausted"
    );
    Err(PersistenceError::AllocationExhausted {
        partition: partition.as_str().to_string(),
        attempts: max_attempts,
    })
}

/// Allocates the next code in `partition` and inserts `ticket` with it.
///
/// # Errors
///
/// Returns `AllocationExhausted` if every attempt lost the race for its
/// code, or the underlying storage error for any other failure.
pub(crate) fn allocate_and_insert<C: TicketStore>(
    conn: &mut C,
    policy: AllocationPolicy,
    partition: &PartitionKey,
    ticket: &NewTicket,
) -> Result<AllocatedTicket, PersistenceError> {
    let allocated: AllocatedTicket = run_allocation(policy, partition, |_| {
        attempt_allocation(conn, partition, ticket)
    })?;

    info!(
        ticket_id = allocated.ticket_id,
        code = %allocated.code,
        "Allocated ticket code"
    );
    Ok(allocated)
}
