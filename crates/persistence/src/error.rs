// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// Every allocation attempt lost the race for its candidate code.
    ///
    /// Nothing was written. The caller may retry the whole operation.
    AllocationExhausted {
        /// The partition codes were being allocated in.
        partition: String,
        /// How many attempts were made.
        attempts: u32,
    },
    /// The requested ticket was not found.
    TicketNotFound(String),
    /// The ticket's status changed between being read and being updated.
    StatusChanged {
        /// The ticket's code.
        code: String,
        /// The status the update was based on.
        expected: String,
        /// The status now stored.
        actual: String,
    },
    /// The requested area was not found.
    AreaNotFound(i64),
    /// The area exists but no longer accepts tickets.
    AreaInactive(i64),
    /// An area with the same name already exists.
    DuplicateArea(String),
    /// A stored row could not be turned back into domain values.
    CorruptRecord(String),
    /// A domain rule rejected the operation.
    Domain(DomainError),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl PersistenceError {
    /// Returns whether retrying the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::AllocationExhausted { .. })
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::AllocationExhausted {
                partition,
                attempts,
            } => write!(
                f,
                "Could not allocate a ticket code in partition {partition} after {attempts} attempts"
            ),
            Self::TicketNotFound(code) => write!(f, "Ticket not found: {code}"),
            Self::StatusChanged {
                code,
                expected,
                actual,
            } => write!(
                f,
                "Ticket {code} is now {actual}, not {expected}; reload it and try again"
            ),
            Self::AreaNotFound(area_id) => write!(f, "Area not found: {area_id}"),
            Self::AreaInactive(area_id) => {
                write!(f, "Area {area_id} is not accepting new tickets")
            }
            Self::DuplicateArea(name) => write!(f, "Area '{name}' already exists"),
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}
