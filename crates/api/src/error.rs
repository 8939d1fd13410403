// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use helpdesk_domain::DomainError;
use helpdesk_persistence::PersistenceError;

use crate::validation::TicketValidationError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. None of them ever carries a ticket code that was not
/// actually stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The ticket could not be numbered because of concurrent traffic.
    ///
    /// Nothing was stored; the client should submit again.
    RetryableConflict {
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns whether the client may succeed by repeating the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RetryableConflict { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::RetryableConflict { message } => write!(f, "{message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<TicketValidationError> for ApiError {
    fn from(err: TicketValidationError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let invalid = |field: &str, message: String| ApiError::InvalidInput {
        field: field.to_string(),
        message,
    };

    match err {
        DomainError::InvalidPartitionKey(msg) => invalid("partition", msg),
        DomainError::InvalidYear(year) => invalid(
            "partition",
            format!("Year {year} cannot be used as a ticket partition"),
        ),
        DomainError::InvalidTicketCode { code, reason } => {
            invalid("code", format!("'{code}' is not a ticket code: {reason}"))
        }
        DomainError::InvalidTitle(msg) => invalid("title", msg),
        DomainError::InvalidDescription(msg) => invalid("description", msg),
        DomainError::InvalidRequester(msg) => invalid("requester", msg),
        DomainError::InvalidAreaName(msg) => invalid("name", msg),
        err @ DomainError::InvalidPriority(_) => invalid("priority", err.to_string()),
        err @ DomainError::InvalidStatus(_) => invalid("status", err.to_string()),
        err @ DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message: err.to_string(),
        },
        err @ DomainError::SequenceOverflow { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Allocation exhaustion becomes a retryable conflict. A status update that
/// lost a race becomes a rule violation. Storage failures become generic
/// internal errors.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::AllocationExhausted { .. } => ApiError::RetryableConflict {
            message: String::from(
                "The ticket could not be numbered because of concurrent activity; please retry",
            ),
        },
        PersistenceError::TicketNotFound(code) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {code} does not exist"),
        },
        PersistenceError::AreaNotFound(area_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Area"),
            message: format!("Area {area_id} does not exist"),
        },
        PersistenceError::AreaInactive(area_id) => {
            TicketValidationError::AreaInactive { area_id }.into()
        }
        err @ PersistenceError::StatusChanged { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_changed"),
            message: err.to_string(),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::DuplicateArea(name) => ApiError::DomainRuleViolation {
            rule: String::from("unique_area_name"),
            message: format!("Area '{name}' already exists"),
        },
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
