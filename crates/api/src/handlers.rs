// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler authorizes first, then validates, then touches storage.
//! Notifications go out only after the change is committed.

use helpdesk_domain::{NewTicket, PartitionKey, Priority, TicketCode, TicketStatus};
use helpdesk_persistence::{AllocatedTicket, AreaData, Persistence, TicketData};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::ApiError;
use crate::notifier::{NotificationKind, Notifier, TicketNotification};
use crate::request_response::{
    AreaInfo, AssignTicketRequest, CreateAreaRequest, CreateTicketRequest, CreateTicketResponse,
    DeleteTicketResponse, ListAreasResponse, ListTicketsRequest, ListTicketsResponse,
    SetAreaActiveRequest, TicketInfo, UpdateStatusRequest,
};
use crate::validation::{TicketValidationError, normalize_assignee};

/// Hands a notification to the notifier, logging instead of failing.
fn send_notification(notifier: &dyn Notifier, notification: &TicketNotification) {
    if let Err(e) = notifier.notify(notification) {
        warn!(
            code = %notification.code,
            kind = ?notification.kind,
            error = %e,
            "Ticket notification was not delivered"
        );
    }
}

fn notification_for(
    kind: NotificationKind,
    ticket: &TicketData,
    actor: &AuthenticatedActor,
) -> TicketNotification {
    TicketNotification {
        kind,
        code: ticket.code.to_string(),
        title: ticket.title.clone(),
        requester: ticket.requester.clone(),
        assignee: ticket.assignee.clone(),
        status: ticket.status.to_string(),
        actor: actor.id.clone(),
    }
}

/// Parses a code from a request path so malformed codes are rejected as input errors.
fn parse_code(code: &str) -> Result<TicketCode, ApiError> {
    Ok(code.trim().parse::<TicketCode>()?)
}

/// Returns whether `actor` may see `ticket` at all.
///
/// Requesters only see their own live tickets. Deleted tickets are visible
/// to agents and admins.
fn can_view(actor: &AuthenticatedActor, ticket: &TicketData) -> bool {
    match actor.role {
        Role::Admin | Role::Agent => true,
        Role::Requester => ticket.requester == actor.id && !ticket.is_deleted(),
    }
}

fn ticket_not_found(code: &str) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Ticket"),
        message: format!("Ticket {code} does not exist"),
    }
}

/// Files a new ticket and assigns it the next code in `partition`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `notifier` - Receives a `Created` notification after commit
/// * `actor` - The authenticated actor; becomes the requester
/// * `request` - The ticket fields
/// * `partition` - The partition to allocate in, normally the current year
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authenticated as at least a requester
/// - A field fails validation or the area is unknown or inactive
/// - The code could not be allocated (`RetryableConflict`)
/// - Storage fails (`Internal`)
pub fn create_ticket(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    request: CreateTicketRequest,
    partition: &PartitionKey,
) -> Result<CreateTicketResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Requester, "create_ticket")?;

    let priority: Priority = match request.priority.as_deref() {
        Some(value) => value.parse()?,
        None => Priority::default(),
    };
    let ticket: NewTicket = NewTicket::new(
        &request.title,
        &request.description,
        priority,
        request.area_id,
        &actor.id,
    );
    helpdesk_domain::validate_new_ticket(&ticket)?;

    // Unknown areas are reported here; whether the area still accepts tickets
    // is decided inside the allocation.
    let area: AreaData = persistence.get_area(ticket.area_id)?;
    let allocated: AllocatedTicket = persistence.create_ticket(partition, &ticket)?;
    let code: String = allocated.code.to_string();

    info!(
        code = %code,
        ticket_id = allocated.ticket_id,
        area = %area.name,
        actor = %actor.id,
        "Ticket filed"
    );

    send_notification(
        notifier,
        &TicketNotification {
            kind: NotificationKind::Created,
            code: code.clone(),
            title: ticket.title,
            requester: ticket.requester,
            assignee: None,
            status: TicketStatus::Open.to_string(),
            actor: actor.id.clone(),
        },
    );

    Ok(CreateTicketResponse {
        ticket_id: allocated.ticket_id,
        message: format!("Ticket {code} created"),
        code,
    })
}

/// Retrieves one ticket by code.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the ticket does not exist or the actor may
/// not see it.
pub fn get_ticket(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    code: &str,
) -> Result<TicketInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Requester, "get_ticket")?;
    let code: TicketCode = parse_code(code)?;
    let code: String = code.to_string();

    let ticket: TicketData = persistence.get_ticket_by_code(&code)?;
    if !can_view(actor, &ticket) {
        return Err(ticket_not_found(&code));
    }

    Ok(ticket.into())
}

/// Lists tickets visible to the actor.
///
/// # Errors
///
/// Returns an error if the partition filter is invalid, a non-admin asks
/// for deleted tickets, or storage fails.
pub fn list_tickets(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &ListTicketsRequest,
) -> Result<ListTicketsResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Requester, "list_tickets")?;
    if request.include_deleted {
        AuthorizationService::require_role(actor, Role::Admin, "list_deleted_tickets")?;
    }

    let partition: Option<PartitionKey> = request
        .partition
        .as_deref()
        .map(|value| {
            PartitionKey::new(value.trim()).map_err(|_| TicketValidationError::InvalidPartition {
                value: value.to_string(),
            })
        })
        .transpose()?;

    let tickets: Vec<TicketInfo> = persistence
        .list_tickets(partition.as_ref(), request.include_deleted)?
        .into_iter()
        .filter(|ticket| can_view(actor, ticket))
        .map(TicketInfo::from)
        .collect();

    Ok(ListTicketsResponse { tickets })
}

/// Soft-deletes a ticket. Its code is never issued again.
///
/// Only Admin actors may delete tickets.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the ticket is unknown
/// or already deleted.
pub fn delete_ticket(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    code: &str,
) -> Result<DeleteTicketResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "delete_ticket")?;
    let code: String = parse_code(code)?.to_string();

    persistence.delete_ticket(&code)?;
    let ticket: TicketData = persistence.get_ticket_by_code(&code)?;

    info!(code = %code, actor = %actor.id, "Ticket deleted");
    send_notification(
        notifier,
        &notification_for(NotificationKind::Deleted, &ticket, actor),
    );

    Ok(DeleteTicketResponse {
        message: format!("Ticket {code} deleted"),
        code,
    })
}

/// Moves a ticket to a new status.
///
/// Agents and admins may change status.
///
/// # Errors
///
/// Returns an error if the actor lacks the role, the status is unknown,
/// the transition is not allowed, or the ticket does not exist.
pub fn update_status(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    code: &str,
    request: &UpdateStatusRequest,
) -> Result<TicketInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Agent, "update_status")?;
    let code: String = parse_code(code)?.to_string();
    let status: TicketStatus = request.status.trim().parse()?;

    let ticket: TicketData = persistence.update_ticket_status(&code, status)?;

    send_notification(
        notifier,
        &notification_for(NotificationKind::StatusChanged, &ticket, actor),
    );

    Ok(ticket.into())
}

/// Sets or clears the agent working a ticket.
///
/// Agents and admins may assign tickets.
///
/// # Errors
///
/// Returns an error if the actor lacks the role, the assignee is blank,
/// or the ticket does not exist.
pub fn assign_ticket(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    code: &str,
    request: &AssignTicketRequest,
) -> Result<TicketInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Agent, "assign_ticket")?;
    let code: String = parse_code(code)?.to_string();
    let assignee: Option<String> = normalize_assignee(request.assignee.as_deref())?;

    let ticket: TicketData = persistence.assign_ticket(&code, assignee.as_deref())?;

    send_notification(
        notifier,
        &notification_for(NotificationKind::Assigned, &ticket, actor),
    );

    Ok(ticket.into())
}

/// Creates a new attention area.
///
/// Only Admin actors may create areas.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the name is invalid or
/// already taken.
pub fn create_area(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateAreaRequest,
) -> Result<AreaInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "create_area")?;

    let description: Option<&str> = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let area: AreaData = persistence.create_area(&request.name, description)?;

    info!(area_id = area.area_id, name = %area.name, actor = %actor.id, "Area created");
    Ok(area.into())
}

/// Opens or closes an area for new tickets.
///
/// Only Admin actors may change area activation.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the area is unknown.
pub fn set_area_active(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    area_id: i64,
    request: &SetAreaActiveRequest,
) -> Result<AreaInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "set_area_active")?;

    let area: AreaData = persistence.set_area_active(area_id, request.active)?;
    Ok(area.into())
}

/// Lists all attention areas.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_areas(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListAreasResponse, ApiError> {
    AuthorizationService::require_role(actor, Role::Requester, "list_areas")?;

    let areas: Vec<AreaInfo> = persistence
        .list_areas()?
        .into_iter()
        .map(AreaInfo::from)
        .collect();

    Ok(ListAreasResponse { areas })
}
