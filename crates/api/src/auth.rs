// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity is supplied by an external provider. This module only models
//! the authenticated actor and checks its role against what an operation
//! needs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles are ranked: `Admin` > `Agent` > `Requester`. An operation that
/// requires a role is open to that role and every role above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Configures areas and may delete tickets.
    Admin,
    /// Triages tickets: changes status and assignment.
    Agent,
    /// Files tickets and follows their own.
    Requester,
}

impl Role {
    const fn rank(self) -> u8 {
        match self {
            Self::Admin => 2,
            Self::Agent => 1,
            Self::Requester => 0,
        }
    }

    /// Returns whether this role grants everything `required` does.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns the role name as used in headers and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Agent => "agent",
            Self::Requester => "requester",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "agent" => Ok(Self::Agent),
            "requester" => Ok(Self::Requester),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that `actor` holds `required` or a higher role.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `required` - The lowest role allowed to perform `action`
    /// * `action` - The operation name, reported on failure
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor's role is too low.
    pub fn require_role(
        actor: &AuthenticatedActor,
        required: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role.satisfies(required) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: required.to_string(),
            })
        }
    }
}

/// Builds an authenticated actor from an identity asserted upstream.
///
/// The server trusts the identity headers set by the authentication
/// provider in front of it; this only checks that they are present.
///
/// # Errors
///
/// Returns an error if the actor ID is blank.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}
