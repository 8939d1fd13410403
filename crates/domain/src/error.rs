// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The partition key is empty or contains forbidden characters.
    InvalidPartitionKey(String),
    /// The year cannot be rendered as a four-digit partition.
    InvalidYear(i32),
    /// A ticket code string could not be parsed.
    InvalidTicketCode {
        /// The code that failed to parse.
        code: String,
        /// Why the code was rejected.
        reason: String,
    },
    /// The next sequence number in a partition does not fit in `u64`.
    SequenceOverflow {
        /// The partition that ran out of numbers.
        partition: String,
    },
    /// Ticket title is empty or too long.
    InvalidTitle(String),
    /// Ticket description is too long.
    InvalidDescription(String),
    /// Requester identity is missing.
    InvalidRequester(String),
    /// Priority string is not recognised.
    InvalidPriority(String),
    /// Status string is not recognised.
    InvalidStatus(String),
    /// Area name is empty or too long.
    InvalidAreaName(String),
    /// A status change that the ticket lifecycle forbids.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPartitionKey(msg) => write!(f, "Invalid partition key: {msg}"),
            Self::InvalidYear(year) => {
                write!(f, "Invalid year {year}: must be between 1000 and 9999")
            }
            Self::InvalidTicketCode { code, reason } => {
                write!(f, "Invalid ticket code '{code}': {reason}")
            }
            Self::SequenceOverflow { partition } => {
                write!(f, "Sequence overflow in partition '{partition}'")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::InvalidRequester(msg) => write!(f, "Invalid requester: {msg}"),
            Self::InvalidPriority(value) => write!(
                f,
                "Invalid priority '{value}': must be one of low, normal, high, urgent"
            ),
            Self::InvalidStatus(value) => write!(
                f,
                "Invalid status '{value}': must be one of open, in_progress, resolved, closed"
            ),
            Self::InvalidAreaName(msg) => write!(f, "Invalid area name: {msg}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot move ticket from '{from}' to '{to}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
