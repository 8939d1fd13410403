// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Helpdesk ticketing system.
//!
//! Handlers take an authenticated actor and a request DTO, enforce role
//! requirements, call into persistence and translate every lower-level
//! error into an [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod notifier;
mod request_response;
mod validation;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    assign_ticket, create_area, create_ticket, delete_ticket, get_ticket, list_areas,
    list_tickets, set_area_active, update_status,
};
pub use notifier::{NotificationKind, Notifier, NotifyError, TicketNotification, TracingNotifier};
pub use request_response::{
    AreaInfo, AssignTicketRequest, CreateAreaRequest, CreateTicketRequest, CreateTicketResponse,
    DeleteTicketResponse, ListAreasResponse, ListTicketsRequest, ListTicketsResponse,
    SetAreaActiveRequest, TicketInfo, UpdateStatusRequest,
};
pub use validation::{TicketValidationError, normalize_assignee};
