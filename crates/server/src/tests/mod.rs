// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use axum::body::Body;
use axum::http::Request;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

const ADMIN: (&str, &str) = ("admin-1", "admin");
const AGENT: (&str, &str) = ("agent-7", "agent");
const REQUESTER: (&str, &str) = ("jdoe", "requester");
const OTHER_REQUESTER: (&str, &str) = ("asmith", "requester");

fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        notifier: Arc::new(TracingNotifier),
    }
}

fn request(
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        builder = builder
            .header(ACTOR_ID_HEADER, id)
            .header(ACTOR_ROLE_HEADER, role);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_area_via_api(app: &Router, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/areas",
            Some(ADMIN),
            Some(serde_json::json!({ "name": name })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let area: AreaInfo = read_json(response).await;
    area.area_id
}

async fn file_ticket(app: &Router, actor: (&str, &str), area_id: i64, title: &str) -> Response {
    app.clone()
        .oneshot(request(
            "POST",
            "/tickets",
            Some(actor),
            Some(serde_json::json!({
                "title": title,
                "description": "Details",
                "priority": "high",
                "area_id": area_id,
            })),
        ))
        .await
        .unwrap()
}

fn current_prefix() -> String {
    PartitionKey::current_year().unwrap().code_prefix()
}

#[tokio::test]
async fn test_create_ticket_returns_first_code_of_current_year() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;

    let response = file_ticket(&app, REQUESTER, area_id, "Printer jammed").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: CreateTicketResponse = read_json(response).await;
    assert_eq!(created.code, format!("{}0001", current_prefix()));
    assert_eq!(created.message, format!("Ticket {} created", created.code));
}

#[tokio::test]
async fn test_sequential_creates_receive_increasing_codes() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;

    let mut codes: Vec<String> = Vec::new();
    for title in ["First", "Second", "Third"] {
        let response = file_ticket(&app, REQUESTER, area_id, title).await;
        let created: CreateTicketResponse = read_json(response).await;
        codes.push(created.code);
    }

    let prefix: String = current_prefix();
    assert_eq!(
        codes,
        vec![
            format!("{prefix}0001"),
            format!("{prefix}0002"),
            format!("{prefix}0003"),
        ]
    );
}

#[tokio::test]
async fn test_deleted_code_is_not_reissued_over_http() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;

    let first: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "First").await).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/tickets/{}/delete", first.code),
            Some(ADMIN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let second: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "Second").await).await;
    assert_eq!(second.code, format!("{}0002", current_prefix()));
}

#[tokio::test]
async fn test_get_ticket_by_code() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;
    let created: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "VPN drops").await).await;

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/tickets/{}", created.code),
            Some(REQUESTER),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ticket: TicketInfo = read_json(response).await;
    assert_eq!(ticket.code, created.code);
    assert_eq!(ticket.title, "VPN drops");
    assert_eq!(ticket.priority, "high");
    assert_eq!(ticket.status, "open");
    assert_eq!(ticket.requester, "jdoe");
}

#[tokio::test]
async fn test_other_requester_cannot_see_ticket() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;
    let created: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "Private").await).await;

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/tickets/{}", created.code),
            Some(OTHER_REQUESTER),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_code_returns_not_found() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(request("GET", "/tickets/2026-0042", Some(AGENT), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = read_json(response).await;
    assert!(body.error);
}

#[tokio::test]
async fn test_malformed_code_returns_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(request("GET", "/tickets/not-a-code", Some(AGENT), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_identity_headers_return_unauthorized() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(request("GET", "/areas", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_returns_unauthorized() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(request("GET", "/areas", Some(("jdoe", "superuser")), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requester_cannot_create_area() {
    let app: Router = build_router(create_test_app_state());

    let response = app
        .oneshot(request(
            "POST",
            "/areas",
            Some(REQUESTER),
            Some(serde_json::json!({ "name": "Facilities" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blank_title_returns_bad_request_and_consumes_no_code() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;

    let response = file_ticket(&app, REQUESTER, area_id, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let created: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "Real one").await).await;
    assert_eq!(created.code, format!("{}0001", current_prefix()));
}

#[tokio::test]
async fn test_inactive_area_rejects_ticket() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Legacy").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/areas/{area_id}/active"),
            Some(ADMIN),
            Some(serde_json::json!({ "active": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let area: AreaInfo = read_json(response).await;
    assert!(!area.is_active);

    let response = file_ticket(&app, REQUESTER, area_id, "Too late").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_agent_status_workflow() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;
    let created: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "Laptop").await).await;
    let status_uri: String = format!("/tickets/{}/status", created.code);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &status_uri,
            Some(AGENT),
            Some(serde_json::json!({ "status": "closed" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ticket: TicketInfo = read_json(response).await;
    assert_eq!(ticket.status, "closed");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &status_uri,
            Some(AGENT),
            Some(serde_json::json!({ "status": "in_progress" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_assign_ticket_over_http() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;
    let created: CreateTicketResponse =
        read_json(file_ticket(&app, REQUESTER, area_id, "Monitor").await).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/tickets/{}/assign", created.code),
            Some(AGENT),
            Some(serde_json::json!({ "assignee": "agent-7" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ticket: TicketInfo = read_json(response).await;
    assert_eq!(ticket.assignee.as_deref(), Some("agent-7"));
}

#[tokio::test]
async fn test_list_tickets_by_partition() {
    let app: Router = build_router(create_test_app_state());
    let area_id: i64 = create_area_via_api(&app, "Service Desk").await;
    for title in ["One", "Two"] {
        let response = file_ticket(&app, REQUESTER, area_id, title).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let year: String = PartitionKey::current_year().unwrap().as_str().to_string();
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/tickets?partition={year}"),
            Some(AGENT),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: ListTicketsResponse = read_json(response).await;
    assert_eq!(listed.tickets.len(), 2);

    let response = app
        .oneshot(request("GET", "/tickets?partition=1999", Some(AGENT), None))
        .await
        .unwrap();
    let listed: ListTicketsResponse = read_json(response).await;
    assert!(listed.tickets.is_empty());
}

#[tokio::test]
async fn test_list_areas() {
    let app: Router = build_router(create_test_app_state());
    create_area_via_api(&app, "Service Desk").await;
    create_area_via_api(&app, "Facilities").await;

    let response = app
        .oneshot(request("GET", "/areas", Some(REQUESTER), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: ListAreasResponse = read_json(response).await;
    assert_eq!(listed.areas.len(), 2);
}

#[test]
fn test_retryable_conflict_maps_to_service_unavailable() {
    let err: HttpError = HttpError::from(ApiError::RetryableConflict {
        message: String::from("please retry"),
    });
    assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);

    let response: Response = err.into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()),
        Some(RETRY_AFTER_SECONDS)
    );
}

#[test]
fn test_internal_error_maps_to_server_error() {
    let err: HttpError = HttpError::from(ApiError::Internal {
        message: String::from("disk full"),
    });
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, "Internal server error");
    assert!(!err.message.contains("disk full"));
    assert!(err.into_response().headers().get(RETRY_AFTER).is_none());
}

#[test]
fn test_args_defaults() {
    let args: Args = Args::parse_from(["helpdesk-server"]);
    assert_eq!(args.port, 3000);
    assert_eq!(args.max_allocation_attempts, 3);
    assert!(args.database.is_none());
    assert!(args.mysql_url.is_none());
}

#[test]
fn test_args_reject_two_databases() {
    let result = Args::try_parse_from([
        "helpdesk-server",
        "--database",
        "helpdesk.db",
        "--mysql-url",
        "mysql://localhost/helpdesk",
    ]);
    assert!(result.is_err());
}
