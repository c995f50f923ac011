mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_health_probe() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_join_creates_pending_member() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Lee", "alice@example.edu"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["full_name"], "Alice Lee");
    assert_eq!(body["data"]["email"], "alice@example.edu");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Lee", "alice@example.edu"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Again", "alice@example.edu"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_join_validation_collects_all_errors() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        json!({
            "fullName": "",
            "email": "not-an-email",
            "phone": "nope",
            "department": "",
            "year": 9
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let errors = body["errors"].as_array().expect("errors array");
    assert!(errors.len() >= 4, "expected several field errors: {body}");

    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"year"));
}

#[tokio::test]
async fn test_member_round_trip() {
    let app = spawn_app().await;
    let token = login(&app).await;

    send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        json!({
            "fullName": "Bob Roy",
            "email": "bob@example.edu",
            "phone": "+19995550199",
            "department": "ECE",
            "year": 3,
            "experience": "CTF player",
            "motivation": "Learn defense"
        }),
    )
    .await;

    let (status, body) = get(&app, "/api/members", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let member = &body["data"][0];
    assert_eq!(member["full_name"], "Bob Roy");
    assert_eq!(member["email"], "bob@example.edu");
    assert_eq!(member["phone"], "+19995550199");
    assert_eq!(member["department"], "ECE");
    assert_eq!(member["year"], 3);
    assert_eq!(member["experience"], "CTF player");
    assert_eq!(member["motivation"], "Learn defense");
    assert_eq!(member["status"], "pending");
}

#[tokio::test]
async fn test_member_status_update_flow() {
    let app = spawn_app().await;
    let token = login(&app).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Lee", "alice@example.edu"),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/members/{id}/status"),
        Some(&token),
        json!({"status": "approved"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    // Unknown vocabulary is rejected before touching the store.
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/members/{id}/status"),
        Some(&token),
        json!({"status": "banned"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/members/9999/status",
        Some(&token),
        json!({"status": "approved"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_stats() {
    let app = spawn_app().await;
    let token = login(&app).await;

    for (i, dept) in ["CSE", "CSE", "ECE"].iter().enumerate() {
        let (_, body) = send_json(
            &app,
            "POST",
            "/api/members/join",
            None,
            json!({
                "fullName": format!("Member {i}"),
                "email": format!("member{i}@example.edu"),
                "phone": "+19995550123",
                "department": dept,
                "year": 1
            }),
        )
        .await;

        let id = body["data"]["id"].as_i64().unwrap();
        if i != 1 {
            send_json(
                &app,
                "PUT",
                &format!("/api/members/{id}/status"),
                Some(&token),
                json!({"status": "approved"}),
            )
            .await;
        }
    }

    let (status, body) = get(&app, "/api/members/stats", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["approved"], 2);
    assert_eq!(body["data"]["pending"], 1);

    let departments = body["data"]["departments"].as_array().unwrap();
    assert_eq!(departments.len(), 2, "only approved members counted: {body}");
}

#[tokio::test]
async fn test_contact_flow_and_idempotent_read() {
    let app = spawn_app().await;
    let token = login(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/contact",
        None,
        json!({
            "name": "Carol Danvers",
            "email": "carol@example.org",
            "subject": "Workshop question",
            "message": "Is the intro workshop open to first-years?"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "unread");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/contact/{id}/read"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "read");

    // Second read is a no-op, not an error.
    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/contact/{id}/read"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "read");

    let (status, body) = get(&app, "/api/contact/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["unread"], 0);
    assert_eq!(body["data"]["read"], 1);
}

#[tokio::test]
async fn test_contact_validation_bounds() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/contact",
        None,
        json!({
            "name": "Al",
            "email": "al@example.org",
            "subject": "Hi",
            "message": "Too short"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"subject"));
    assert!(fields.contains(&"message"));
}

#[tokio::test]
async fn test_event_registration_duplicate_and_capacity() {
    let app = spawn_app().await;
    let token = login(&app).await;

    let event_id = create_event(&app, &token, "CTF Night", Some(2)).await;

    let register = |email: &str| {
        json!({
            "eventId": event_id,
            "name": "Participant",
            "email": email,
        })
    };

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        register("p1@example.edu"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same (event, email) pair registers exactly once.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        register("p1@example.edu"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // Second slot fills the event.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        register("p2@example.edu"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Capacity reached: the (N+1)-th registration is refused.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        register("p3@example.edu"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = get(
        &app,
        &format!("/api/events/{event_id}/registrations"),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, &format!("/api/events/{event_id}"), None).await;
    assert_eq!(body["data"]["registered_count"], 2);
}

#[tokio::test]
async fn test_register_for_unknown_event() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        json!({
            "eventId": 42,
            "name": "Ghost",
            "email": "ghost@example.org",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_event_crud_and_cascade() {
    let (app, state) = spawn_app_with_state().await;
    let token = login(&app).await;

    let event_id = create_event(&app, &token, "Intro Meeting", None).await;

    let (status, body) = get(&app, "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/admin/events/{event_id}"),
        Some(&token),
        json!({
            "name": "Intro Meeting (moved)",
            "schedule": "2030-05-02T17:00:00Z",
            "location": "Auditorium",
            "status": "upcoming"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Intro Meeting (moved)");

    send_json(
        &app,
        "POST",
        "/api/events/register",
        None,
        json!({"eventId": event_id, "name": "P", "email": "p@example.edu"}),
    )
    .await;

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/admin/events/{event_id}"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &format!("/api/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Registrations went with the event.
    let orphans = state
        .store()
        .event_registrations(event_id)
        .await
        .expect("query registrations");
    assert!(orphans.is_empty());
}

#[tokio::test]
async fn test_member_csv_export() {
    let app = spawn_app().await;
    let token = login(&app).await;

    send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Lee", "alice@example.edu"),
    )
    .await;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/export/members")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(csv.starts_with("ID,Full Name,Email,"));
    assert!(csv.contains("\"Alice Lee\""));
    assert!(csv.contains("alice@example.edu"));
}

#[tokio::test]
async fn test_dashboard_aggregates() {
    let app = spawn_app().await;
    let token = login(&app).await;

    send_json(
        &app,
        "POST",
        "/api/members/join",
        None,
        join_payload("Alice Lee", "alice@example.edu"),
    )
    .await;
    send_json(
        &app,
        "POST",
        "/api/contact",
        None,
        json!({
            "name": "Carol Danvers",
            "email": "carol@example.org",
            "subject": "Workshop question",
            "message": "Is the intro workshop open to first-years?"
        }),
    )
    .await;
    create_event(&app, &token, "Future Event", None).await;

    let (status, body) = get(&app, "/api/admin/dashboard", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["statistics"]["members"]["total"], 1);
    assert_eq!(body["data"]["statistics"]["contacts"]["unread"], 1);
    assert_eq!(body["data"]["statistics"]["events"]["upcoming"], 1);
    assert_eq!(
        body["data"]["recent_activity"]["members"][0]["full_name"],
        "Alice Lee"
    );
    assert_eq!(
        body["data"]["recent_activity"]["events"][0]["name"],
        "Future Event"
    );
}
