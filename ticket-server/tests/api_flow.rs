//! HTTP-level tests driving the full router (middleware included) with
//! `oneshot` against an in-memory store seeded with the demo data.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use ticket_server::api::build_app;
use ticket_server::{Config, ServerState};

fn demo_app() -> Router {
    let mut config = Config::for_tests("unused");
    config.seed_demo_data = true;
    build_app(ServerState::in_memory(config).unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let (status, _, bytes) = send(app, request).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "ticket-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn upload(
    app: &Router,
    token: &str,
    field: &str,
    filename: &str,
    content: &[u8],
) -> (StatusCode, Value) {
    let (content_type, body) = multipart(field, filename, content);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/import/tickets")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_is_public_and_tagged_with_request_id() {
    let app = demo_app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, headers, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key("x-request-id"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&app, Method::GET, "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["lastTicketNumber"], 5);
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = demo_app();
    let (status, body) = call(&app, Method::GET, "/api/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = call(&app, Method::GET, "/api/tickets", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = demo_app();
    let (s1, unknown) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "admin123"})),
    )
    .await;
    let (s2, wrong) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["code"], 1002);
}

#[tokio::test]
async fn test_me_returns_actor() {
    let app = demo_app();
    let token = login(&app, "technician1", "tech123").await;
    let (status, body) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["username"], "technician1");
    assert_eq!(body["data"]["role"], "technician");
    assert_eq!(body["data"]["command"], "District Command");
}

#[tokio::test]
async fn test_ticket_lifecycle_over_http() {
    let app = demo_app();
    let token = login(&app, "technician1", "tech123").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&token),
        Some(json!({
            "command": "District Command",
            "unit": "Base 227",
            "priority": "urgent",
            "description": "Generator does not start"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let ticket = &body["data"];
    assert_eq!(ticket["ticketNumber"], 6);
    assert_eq!(ticket["status"], "open");
    assert_eq!(ticket["createdBy"], "technician1");
    let id = ticket["id"].as_u64().unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/tickets/{id}"),
        Some(&token),
        Some(json!({"status": "resolved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "resolved");
    assert!(body["data"]["closeDate"].is_i64());
    assert_eq!(body["data"]["priority"], "urgent");

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/tickets/{id}/comments"),
        Some(&token),
        Some(json!({"content": "Replaced the starter"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comments"][0]["author"], "technician1");

    // technicians may not delete
    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/tickets/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let admin = login(&app, "admin", "admin123").await;
    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/tickets/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        call(&app, Method::GET, &format!("/api/tickets/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_technician_scoped_to_own_command() {
    let app = demo_app();
    let token = login(&app, "technician1", "tech123").await;

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/tickets?command=IDF",
        Some(&token),
        None,
    )
    .await;
    let idf_id = body["data"]["items"][0]["id"].as_u64().unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/tickets/{idf_id}"),
        Some(&token),
        Some(json!({"priority": "critical"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);
}

#[tokio::test]
async fn test_viewer_is_read_only() {
    let app = demo_app();
    let token = login(&app, "viewer1", "view123").await;

    let (status, body) = call(&app, Method::GET, "/api/tickets", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 5);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&token),
        Some(json!({"command": "IDF", "unit": "Golani Brigade", "description": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/tickets/1/comments",
        Some(&token),
        Some(json!({"content": "me too"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = demo_app();
    let token = login(&app, "admin", "admin123").await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/tickets?command=District%20Command&status=open",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["unit"], "Electrical Unit 650");

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/tickets?page=2&limit=2",
        Some(&token),
        None,
    )
    .await;
    let page = &body["data"];
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["hasPrev"], true);
    assert_eq!(page["hasNext"], true);
    assert_eq!(page["items"][0]["ticketNumber"], 3);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/tickets?status=closed",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3005);
}

#[tokio::test]
async fn test_stats_and_export() {
    let app = demo_app();
    let token = login(&app, "viewer1", "view123").await;

    let (status, body) = call(&app, Method::GET, "/api/tickets/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["resolved"], 2);
    assert_eq!(body["data"]["recurring"], 1);

    let request = Request::builder()
        .uri("/api/tickets/export?priority=critical")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let csv = String::from_utf8(body).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Recurring power outage"));
}

#[tokio::test]
async fn test_user_routes_admin_only() {
    let app = demo_app();
    let tech = login(&app, "technician1", "tech123").await;
    let (status, body) = call(&app, Method::GET, "/api/users", Some(&tech), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let admin = login(&app, "admin", "admin123").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(&admin),
        Some(json!({
            "username": "technician3",
            "password": "secret99",
            "role": "technician",
            "command": "Police",
            "unit": "Border Police"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"].get("passwordHash").is_none());
    let id = body["data"]["id"].as_u64().unwrap();

    let (status, body) = call(&app, Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert!(!body.to_string().contains("argon2"));

    // new account can log in, then loses it on delete
    login(&app, "technician3", "secret99").await;
    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/users/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "technician3", "password": "secret99"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reference_routes() {
    let app = demo_app();
    let tech = login(&app, "technician1", "tech123").await;

    let (status, body) = call(&app, Method::GET, "/api/commands", Some(&tech), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/commands",
        Some(&tech),
        Some(json!({"name": "Navy"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&app, "admin", "admin123").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/commands",
        Some(&admin),
        Some(json!({"name": "Navy", "description": "Naval command"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let navy = body["data"]["id"].as_u64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/units",
        Some(&admin),
        Some(json!({"command": "Navy", "name": "Haifa Port"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/commands/{navy}/units"),
        Some(&tech),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Haifa Port");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/commands",
        Some(&admin),
        Some(json!({"name": "Navy"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn test_import_rejects_bad_uploads() {
    let mut config = Config::for_tests("unused");
    config.max_import_bytes = 64;
    let app = build_app(ServerState::in_memory(config).unwrap());
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = upload(&app, &admin, "excelFile", "tickets.csv", b"a,b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);

    let (status, body) = upload(&app, &admin, "otherField", "tickets.xlsx", b"data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);

    let (status, body) = upload(&app, &admin, "excelFile", "tickets.xlsx", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6004);

    let (status, body) = upload(&app, &admin, "excelFile", "tickets.xlsx", &[b'x'; 100]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 6001);

    let (status, body) = upload(&app, &admin, "excelFile", "tickets.xlsx", b"not a zip").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6005);
}

async fn call_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    content_type: &str,
    body: &'static str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_malformed_requests_use_the_envelope() {
    let app = demo_app();
    let admin = login(&app, "admin", "admin123").await;

    // well-formed JSON with a wrong-typed field
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&admin),
        Some(json!({
            "command": "District Command",
            "unit": "Base 227",
            "isRecurring": "yes",
            "description": "Door jammed"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["message"].as_str().unwrap().contains("invalid type"));

    let (status, body) = call_raw(
        &app,
        Method::PUT,
        "/api/tickets/1",
        &admin,
        "application/json",
        r#"{"status": "resol"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert!(body["message"].is_string());

    let (status, body) = call_raw(
        &app,
        Method::POST,
        "/api/tickets/1/comments",
        &admin,
        "text/plain",
        r#"{"content": "hi"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (status, body) = call(&app, Method::GET, "/api/tickets/abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/tickets?limit=5&pageSize=7",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = call_raw(
        &app,
        Method::POST,
        "/api/import/tickets",
        &admin,
        "application/json",
        "{}",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_not_found() {
    let app = demo_app();
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = call(&app, Method::GET, "/api/nope", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3);
    assert_eq!(body["details"]["resource"], "Route /api/nope");
}

#[tokio::test]
async fn test_import_workbook_over_http() {
    let app = demo_app();
    let admin = login(&app, "admin", "admin123").await;

    let workbook = include_bytes!("fixtures/tickets.xlsx");
    let (status, body) = upload(&app, &admin, "excelFile", "tickets.xlsx", workbook).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let report = &body["data"];
    assert_eq!(report["totalRows"], 4);
    assert_eq!(report["imported"], 3);
    assert_eq!(report["errors"], 1);
    assert_eq!(report["successRate"], 75.0);
    assert_eq!(report["ticketNumbers"], json!([6, 7, 8]));
    // the row without a description sits on sheet line 5
    let detail = report["errorDetails"][0].as_str().unwrap();
    assert!(detail.starts_with("Row 5: "), "{detail}");

    let (_, body) = call(&app, Method::GET, "/api/tickets", Some(&admin), None).await;
    assert_eq!(body["data"]["total"], 8);

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/tickets?command=Fire%20%26%20Rescue",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["priority"], "normal");
    assert_eq!(body["data"]["items"][0]["status"], "open");
}
