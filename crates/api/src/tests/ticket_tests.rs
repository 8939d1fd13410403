// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::PartitionKey;

use super::helpers::{
    FailingNotifier, RecordingNotifier, create_other_requester, create_test_admin,
    create_test_agent, create_test_requester, partition_2026, setup_persistence, ticket_request,
};
use crate::{
    ApiError, AssignTicketRequest, CreateTicketRequest, ListTicketsRequest, NotificationKind,
    SetAreaActiveRequest, UpdateStatusRequest, assign_ticket, create_ticket, delete_ticket,
    get_ticket, list_tickets, set_area_active, update_status,
};

#[test]
fn test_create_ticket_assigns_first_code_and_notifies() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let requester = create_test_requester();

    let response = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    assert_eq!(response.code, "2026-0001");
    assert!(response.ticket_id > 0);
    assert_eq!(response.message, "Ticket 2026-0001 created");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Created);
    assert_eq!(sent[0].code, "2026-0001");
    assert_eq!(sent[0].requester, "jdoe");
    assert_eq!(sent[0].status, "open");
}

#[test]
fn test_create_ticket_records_actor_as_requester() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();

    let response = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();
    let ticket = get_ticket(&mut persistence, &create_test_agent(), &response.code).unwrap();

    assert_eq!(ticket.requester, "jdoe");
    assert_eq!(ticket.priority, "high");
    assert_eq!(ticket.status, "open");
}

#[test]
fn test_create_ticket_defaults_priority_to_normal() {
    let (mut persistence, area_id) = setup_persistence();
    let mut request = ticket_request(area_id);
    request.priority = None;

    let response = create_ticket(
        &mut persistence,
        &RecordingNotifier::default(),
        &create_test_requester(),
        request,
        &partition_2026(),
    )
    .unwrap();
    let ticket = get_ticket(&mut persistence, &create_test_admin(), &response.code).unwrap();

    assert_eq!(ticket.priority, "normal");
}

#[test]
fn test_codes_follow_partition() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let requester = create_test_requester();
    let next_year = PartitionKey::for_year(2027).unwrap();

    let first = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();
    let second = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &next_year,
    )
    .unwrap();
    let third = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    assert_eq!(first.code, "2026-0001");
    assert_eq!(second.code, "2027-0001");
    assert_eq!(third.code, "2026-0002");
}

#[test]
fn test_notification_failure_does_not_fail_creation() {
    let (mut persistence, area_id) = setup_persistence();

    let response = create_ticket(
        &mut persistence,
        &FailingNotifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    );

    assert_eq!(response.unwrap().code, "2026-0001");
}

#[test]
fn test_invalid_fields_are_rejected_without_notification() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let request = CreateTicketRequest {
        title: String::from("   "),
        description: String::new(),
        priority: None,
        area_id,
    };

    let result = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        request,
        &partition_2026(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "title"
    ));
    assert!(notifier.sent().is_empty());
    assert_eq!(persistence.count_tickets(true).unwrap(), 0);
}

#[test]
fn test_unknown_priority_is_invalid_input() {
    let (mut persistence, area_id) = setup_persistence();
    let mut request = ticket_request(area_id);
    request.priority = Some(String::from("critical"));

    let result = create_ticket(
        &mut persistence,
        &RecordingNotifier::default(),
        &create_test_requester(),
        request,
        &partition_2026(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "priority"
    ));
}

#[test]
fn test_unknown_area_is_not_found() {
    let (mut persistence, area_id) = setup_persistence();

    let result = create_ticket(
        &mut persistence,
        &RecordingNotifier::default(),
        &create_test_requester(),
        ticket_request(area_id + 50),
        &partition_2026(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Area"
    ));
}

#[test]
fn test_inactive_area_rejects_new_tickets() {
    let (mut persistence, area_id) = setup_persistence();
    set_area_active(
        &mut persistence,
        &create_test_admin(),
        area_id,
        &SetAreaActiveRequest { active: false },
    )
    .unwrap();

    let result = create_ticket(
        &mut persistence,
        &RecordingNotifier::default(),
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "area_id"
    ));
    assert_eq!(persistence.max_issued_sequence(&partition_2026()).unwrap(), 0);
}

#[test]
fn test_requester_sees_only_own_tickets() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let mine = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();
    let theirs = create_ticket(
        &mut persistence,
        &notifier,
        &create_other_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let listed = list_tickets(
        &mut persistence,
        &create_test_requester(),
        &ListTicketsRequest::default(),
    )
    .unwrap();
    let foreign = get_ticket(&mut persistence, &create_test_requester(), &theirs.code);

    assert_eq!(listed.tickets.len(), 1);
    assert_eq!(listed.tickets[0].code, mine.code);
    assert!(matches!(foreign, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_agent_lists_by_partition() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let requester = create_test_requester();
    for partition in [partition_2026(), partition_2026(), PartitionKey::for_year(2027).unwrap()] {
        create_ticket(
            &mut persistence,
            &notifier,
            &requester,
            ticket_request(area_id),
            &partition,
        )
        .unwrap();
    }

    let listed = list_tickets(
        &mut persistence,
        &create_test_agent(),
        &ListTicketsRequest {
            partition: Some(String::from("2026")),
            include_deleted: false,
        },
    )
    .unwrap();

    let codes: Vec<&str> = listed.tickets.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, vec!["2026-0001", "2026-0002"]);
}

#[test]
fn test_invalid_partition_filter() {
    let (mut persistence, _) = setup_persistence();

    let result = list_tickets(
        &mut persistence,
        &create_test_agent(),
        &ListTicketsRequest {
            partition: Some(String::from("20%")),
            include_deleted: false,
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "partition"
    ));
}

#[test]
fn test_only_admin_lists_deleted_tickets() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let created = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();
    delete_ticket(&mut persistence, &notifier, &create_test_admin(), &created.code).unwrap();
    let request = ListTicketsRequest {
        partition: None,
        include_deleted: true,
    };

    let by_agent = list_tickets(&mut persistence, &create_test_agent(), &request);
    let by_admin = list_tickets(&mut persistence, &create_test_admin(), &request).unwrap();

    assert!(matches!(by_agent, Err(ApiError::Unauthorized { .. })));
    assert_eq!(by_admin.tickets.len(), 1);
    assert!(by_admin.tickets[0].deleted);
}

#[test]
fn test_deleted_code_is_not_reissued() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let requester = create_test_requester();
    let first = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let deleted = delete_ticket(&mut persistence, &notifier, &create_test_admin(), &first.code)
        .unwrap();
    let second = create_ticket(
        &mut persistence,
        &notifier,
        &requester,
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    assert_eq!(deleted.code, "2026-0001");
    assert_eq!(second.code, "2026-0002");
    assert_eq!(
        notifier
            .sent()
            .iter()
            .map(|n| n.kind)
            .collect::<Vec<NotificationKind>>(),
        vec![
            NotificationKind::Created,
            NotificationKind::Deleted,
            NotificationKind::Created
        ]
    );
}

#[test]
fn test_status_update_and_forbidden_transition() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let agent = create_test_agent();
    let created = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let closed = update_status(
        &mut persistence,
        &notifier,
        &agent,
        &created.code,
        &UpdateStatusRequest {
            status: String::from("closed"),
        },
    )
    .unwrap();
    let resolved = update_status(
        &mut persistence,
        &notifier,
        &agent,
        &created.code,
        &UpdateStatusRequest {
            status: String::from("resolved"),
        },
    );

    assert_eq!(closed.status, "closed");
    assert!(matches!(
        resolved,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "status_transition"
    ));
}

#[test]
fn test_unknown_status_is_invalid_input() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let created = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let result = update_status(
        &mut persistence,
        &notifier,
        &create_test_agent(),
        &created.code,
        &UpdateStatusRequest {
            status: String::from("escalated"),
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_assign_trims_and_clears() {
    let (mut persistence, area_id) = setup_persistence();
    let notifier = RecordingNotifier::default();
    let agent = create_test_agent();
    let created = create_ticket(
        &mut persistence,
        &notifier,
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let assigned = assign_ticket(
        &mut persistence,
        &notifier,
        &agent,
        &created.code,
        &AssignTicketRequest {
            assignee: Some(String::from("  agent-7 ")),
        },
    )
    .unwrap();
    let blank = assign_ticket(
        &mut persistence,
        &notifier,
        &agent,
        &created.code,
        &AssignTicketRequest {
            assignee: Some(String::from("   ")),
        },
    );
    let cleared = assign_ticket(
        &mut persistence,
        &notifier,
        &agent,
        &created.code,
        &AssignTicketRequest { assignee: None },
    )
    .unwrap();

    assert_eq!(assigned.assignee.as_deref(), Some("agent-7"));
    assert!(matches!(
        blank,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "assignee"
    ));
    assert!(cleared.assignee.is_none());
}

#[test]
fn test_malformed_code_is_invalid_input() {
    let (mut persistence, _) = setup_persistence();

    let result = get_ticket(&mut persistence, &create_test_agent(), "not-a-code");

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "code"
    ));
}

#[test]
fn test_short_code_is_normalized_before_lookup() {
    let (mut persistence, area_id) = setup_persistence();
    create_ticket(
        &mut persistence,
        &RecordingNotifier::default(),
        &create_test_requester(),
        ticket_request(area_id),
        &partition_2026(),
    )
    .unwrap();

    let ticket = get_ticket(&mut persistence, &create_test_agent(), "2026-1").unwrap();

    assert_eq!(ticket.code, "2026-0001");
}
