//! HTTP surface driven through the fully layered router with `oneshot`

mod common;

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use care_server::api::build_app;
use common::test_state;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::ServerEvent;
use shared::util::now_millis;
use tower::ServiceExt;

const HOUR: i64 = 3_600_000;

async fn call(
    app: &Router,
    method: &str,
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn registration(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "password": "correct horse battery",
        "first_name": "Test",
        "last_name": "User",
        "role": role,
        "phone_number": null,
        "address": null,
        "language": "en",
        "latitude": null,
        "longitude": null
    })
}

/// Register + login, returning (user id, token)
async fn sign_up(app: &Router, email: &str, role: &str) -> (String, String) {
    let (status, user) = call(
        app,
        "POST",
        "/api/users/register",
        None,
        Some(registration(email, role)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {email}: {user}");

    let (status, login) = call(
        app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": email, "password": "correct horse battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        user["id"].as_str().unwrap().to_string(),
        login["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health_is_public() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["online_users"], 0);
    assert_eq!(body["connections"], 0);
}

#[tokio::test]
async fn test_auth_required_and_login_errors() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (status, body) = call(&app, "GET", "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = call(&app, "GET", "/api/tasks", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let (_, token) = sign_up(&app, "family@x.com", "FAMILY").await;

    let (status, body) = call(&app, "POST", "/api/users/register", None, Some(registration("FAMILY@x.com", "FAMILY"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    let (status, body) = call(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "family@x.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, me) = call(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "family@x.com");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn test_task_lifecycle_and_volunteer_accept() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state.clone());

    let (family_id, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let (volunteer_id, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;
    let (_, other_volunteer) = sign_up(&app, "vol2@x.com", "VOLUNTEER").await;
    let (_, stranger) = sign_up(&app, "elder@x.com", "ELDERLY").await;

    let now = now_millis();

    // reminder after schedule
    let (status, body) = call(
        &app,
        "POST",
        "/api/tasks",
        Some(&family),
        Some(json!({ "title": "Groceries", "scheduled_at": now, "reminder_at": now + HOUR })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3002);

    let (status, task) = call(
        &app,
        "POST",
        "/api/tasks",
        Some(&family),
        Some(json!({ "title": "Groceries", "scheduled_at": now + 2 * HOUR, "reminder_at": now + HOUR })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{task}");
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["created_by"], family_id.as_str());
    let task_id = task["id"].as_str().unwrap().to_string();

    let (_, list) = call(&app, "GET", "/api/tasks", Some(&family), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // role gate
    let (status, body) = call(&app, "GET", "/api/volunteer/unassigned", Some(&family), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, open) = call(&app, "GET", "/api/volunteer/unassigned", Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(open["tasks"].as_array().unwrap().len(), 1);
    assert!(open["groceries"].as_array().unwrap().is_empty());

    let mut family_live = state.hub.subscribe(family_id.clone());

    let accept_uri = format!("/api/volunteer/accept/task/{task_id}");
    let (status, accepted) = call(&app, "PATCH", &accept_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["assigned_to"], volunteer_id.as_str());

    let event = tokio::time::timeout(Duration::from_millis(200), family_live.recv())
        .await
        .unwrap();
    assert!(matches!(event, Some(ServerEvent::TaskUpdated(_))));

    let (status, body) = call(&app, "PATCH", &accept_uri, Some(&other_volunteer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3003);

    // status: only stakeholders
    let status_uri = format!("/api/tasks/{task_id}/status");
    let (status, _) = call(&app, "PATCH", &status_uri, Some(&stranger), Some(json!({ "status": "COMPLETED" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, done) = call(&app, "PATCH", &status_uri, Some(&volunteer), Some(json!({ "status": "COMPLETED" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "COMPLETED");

    // delete: creator only
    let task_uri = format!("/api/tasks/{task_id}");
    let (status, _) = call(&app, "DELETE", &task_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, deleted) = call(&app, "DELETE", &task_uri, Some(&family), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));

    let (status, body) = call(&app, "GET", &task_uri, Some(&family), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_emergency_broadcast_and_acknowledge() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state.clone());

    let (_, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (family_id, family) = sign_up(&app, "family@x.com", "FAMILY").await;

    let mut connected = state.hub.subscribe(family_id.clone());

    let (status, alert) = call(
        &app,
        "POST",
        "/api/emergency/trigger",
        Some(&elder),
        Some(json!({ "latitude": 52.52, "longitude": 13.40, "message": "fell down" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alert["acknowledged"], false);

    let mut late = state.hub.subscribe("user:late");

    let event = tokio::time::timeout(Duration::from_millis(200), connected.recv())
        .await
        .unwrap();
    assert!(matches!(event, Some(ServerEvent::EmergencyAlert(ref a)) if a.message.as_deref() == Some("fell down")));
    assert!(
        tokio::time::timeout(Duration::from_millis(50), late.recv())
            .await
            .is_err()
    );

    let (_, open) = call(&app, "GET", "/api/emergency", Some(&family), None).await;
    assert_eq!(open.as_array().unwrap().len(), 1);

    let ack_uri = format!("/api/emergency/{}/acknowledge", alert["id"].as_str().unwrap());
    let (status, acked) = call(&app, "PATCH", &ack_uri, Some(&family), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(acked["acknowledged"], true);
    assert_eq!(acked["acknowledged_by"], family_id.as_str());

    let (_, open) = call(&app, "GET", "/api/emergency", Some(&family), None).await;
    assert!(open.as_array().unwrap().is_empty());

    let (status, body) = call(&app, "PATCH", "/api/emergency/missing/acknowledge", Some(&family), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_chat_is_participant_only() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state.clone());

    let (family_id, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let (volunteer_id, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;
    let (_, outsider) = sign_up(&app, "out@x.com", "VOLUNTEER").await;

    let (status, room) = call(
        &app,
        "POST",
        "/api/chat/rooms",
        Some(&family),
        Some(json!({ "participants": [volunteer_id], "name": "Groceries" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["participants"][0], family_id.as_str());
    assert_eq!(room["is_group_chat"], false);
    let room_id = room["id"].as_str().unwrap().to_string();

    let mut in_room = state.hub.subscribe(volunteer_id.clone());
    in_room.join_room(room_id.clone());

    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/message",
        Some(&outsider),
        Some(json!({ "room": room_id, "message": "let me in" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/message",
        Some(&family),
        Some(json!({ "room": room_id, "message": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    for text in ["first", "second"] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/chat/message",
            Some(&family),
            Some(json!({ "room": room_id, "message": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let event = tokio::time::timeout(Duration::from_millis(200), in_room.recv())
        .await
        .unwrap();
    assert!(matches!(event, Some(ServerEvent::ChatMessage(ref m)) if m.message == "first"));

    let room_uri = format!("/api/chat/rooms/{room_id}");
    let (status, messages) = call(&app, "GET", &room_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<_> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);

    let (status, _) = call(&app, "GET", &room_uri, Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, rooms) = call(&app, "GET", "/api/chat/rooms", Some(&outsider), None).await;
    assert!(rooms.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_volunteer_cannot_accept_closed_task() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (_, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let (_, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;

    let now = now_millis();
    let (_, task) = call(
        &app,
        "POST",
        "/api/tasks",
        Some(&family),
        Some(json!({ "title": "Pharmacy run", "scheduled_at": now + 2 * HOUR, "reminder_at": now + HOUR })),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let status_uri = format!("/api/tasks/{task_id}/status");
    let (status, _) = call(&app, "PATCH", &status_uri, Some(&family), Some(json!({ "status": "MISSED" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, open) = call(&app, "GET", "/api/volunteer/unassigned", Some(&volunteer), None).await;
    assert!(open["tasks"].as_array().unwrap().is_empty());

    let accept_uri = format!("/api/volunteer/accept/task/{task_id}");
    let (status, body) = call(&app, "PATCH", &accept_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3004);

    let (_, unchanged) = call(&app, "GET", &format!("/api/tasks/{task_id}"), Some(&family), None).await;
    assert_eq!(unchanged["status"], "MISSED");
    assert!(unchanged["assigned_to"].is_null());

    let (status, body) = call(&app, "PATCH", "/api/volunteer/accept/task/missing", Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_task_title_limit_counts_characters() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (_, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let now = now_millis();

    // 200 个字符，600 字节
    let title = "药".repeat(200);
    let (status, task) = call(
        &app,
        "POST",
        "/api/tasks",
        Some(&family),
        Some(json!({ "title": title, "scheduled_at": now + 2 * HOUR, "reminder_at": now + HOUR })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{task}");

    let (status, body) = call(
        &app,
        "POST",
        "/api/tasks",
        Some(&family),
        Some(json!({ "title": format!("{title}药"), "scheduled_at": now + 2 * HOUR, "reminder_at": now + HOUR })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("201 chars"));
}

#[tokio::test]
async fn test_chat_room_participants_must_exist() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (_, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let (volunteer_id, _) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/rooms",
        Some(&family),
        Some(json!({ "participants": [volunteer_id, "user:ghost"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
    assert_eq!(body["details"]["field"], "participants");

    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/rooms",
        Some(&family),
        Some(json!({ "participants": [""] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (_, rooms) = call(&app, "GET", "/api/chat/rooms", Some(&family), None).await;
    assert!(rooms.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_prescriptions_for_patient_and_family_only() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (elder_id, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (_, family) = sign_up(&app, "family@x.com", "FAMILY").await;
    let (_, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;

    let now = now_millis();
    let prescription = |user_id: &str| {
        json!({
            "user_id": user_id,
            "medication_name": "Metformin",
            "dosage": "500 mg",
            "frequency": "twice daily",
            "start_date": now,
            "end_date": now + 30 * 24 * HOUR,
            "notes": "with meals"
        })
    };

    let (status, created) = call(&app, "POST", "/api/prescriptions", Some(&family), Some(prescription(&elder_id))).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["user"], elder_id.as_str());
    assert_eq!(created["medication_name"], "Metformin");

    let (status, body) = call(&app, "POST", "/api/prescriptions", Some(&family), Some(prescription("user:ghost"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, _) = call(&app, "POST", "/api/prescriptions", Some(&volunteer), Some(prescription(&elder_id))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut backwards = prescription(&elder_id);
    backwards["end_date"] = json!(now - HOUR);
    let (status, _) = call(&app, "POST", "/api/prescriptions", Some(&elder), Some(backwards)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let list_uri = format!("/api/prescriptions/{elder_id}");
    let (status, own) = call(&app, "GET", &list_uri, Some(&elder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, "GET", &list_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grocery_order_through_volunteer_accept() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state.clone());

    let (elder_id, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (volunteer_id, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;
    let (_, other_volunteer) = sign_up(&app, "vol2@x.com", "VOLUNTEER").await;

    let (status, _) = call(&app, "POST", "/api/grocery", Some(&elder), Some(json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, order) = call(
        &app,
        "POST",
        "/api/grocery",
        Some(&elder),
        Some(json!({ "items": [{ "name": "milk", "quantity": 2 }, "bread"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "REQUESTED");
    assert_eq!(order["items"][0]["name"], "milk");
    let order_id = order["id"].as_str().unwrap().to_string();

    let (_, open) = call(&app, "GET", "/api/volunteer/unassigned", Some(&volunteer), None).await;
    assert!(open["tasks"].as_array().unwrap().is_empty());
    assert_eq!(open["groceries"][0]["id"], order_id.as_str());

    // 外人不能改状态
    let status_uri = format!("/api/grocery/{order_id}/status");
    let (status, _) = call(&app, "PATCH", &status_uri, Some(&volunteer), Some(json!({ "status": "COMPLETED" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut elder_live = state.hub.subscribe(elder_id.clone());
    let accept_uri = format!("/api/volunteer/accept/grocery/{order_id}");
    let (status, accepted) = call(&app, "PATCH", &accept_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");
    assert_eq!(accepted["assigned_to"], volunteer_id.as_str());

    let event = tokio::time::timeout(Duration::from_millis(200), elder_live.recv())
        .await
        .unwrap();
    assert!(matches!(event, Some(ServerEvent::GroceryUpdated(ref o)) if o.status.as_str() == "ACCEPTED"));

    let (status, body) = call(&app, "PATCH", &accept_uri, Some(&other_volunteer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    let (_, open) = call(&app, "GET", "/api/volunteer/unassigned", Some(&volunteer), None).await;
    assert!(open["groceries"].as_array().unwrap().is_empty());

    let (status, done) = call(&app, "PATCH", &status_uri, Some(&volunteer), Some(json!({ "status": "COMPLETED" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "COMPLETED");

    for token in [&elder, &volunteer] {
        let (_, mine) = call(&app, "GET", "/api/grocery/myorders", Some(token), None).await;
        assert_eq!(mine.as_array().unwrap().len(), 1);
    }
    let (_, theirs) = call(&app, "GET", "/api/grocery/myorders", Some(&other_volunteer), None).await;
    assert!(theirs.as_array().unwrap().is_empty());

    // cancelled before anyone took it
    let (_, cancelled) = call(&app, "POST", "/api/grocery", Some(&elder), Some(json!({ "items": ["tea"] }))).await;
    let cancelled_id = cancelled["id"].as_str().unwrap().to_string();
    call(&app, "PATCH", &format!("/api/grocery/{cancelled_id}/status"), Some(&elder), Some(json!({ "status": "CANCELLED" }))).await;
    let (status, body) = call(&app, "PATCH", &format!("/api/volunteer/accept/grocery/{cancelled_id}"), Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7003);

    let (status, body) = call(&app, "PATCH", "/api/grocery/missing/status", Some(&elder), Some(json!({ "status": "CANCELLED" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_forum_posts_and_comments() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (author_id, author) = sign_up(&app, "author@x.com", "FAMILY").await;
    let (_, reader) = sign_up(&app, "reader@x.com", "VOLUNTEER").await;

    let (status, first) = call(
        &app,
        "POST",
        "/api/forum/posts",
        Some(&author),
        Some(json!({ "title": "Walking group", "content": "Tuesdays at 10 in the park" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["author"], author_id.as_str());
    let post_id = first["id"].as_str().unwrap().to_string();

    let (_, second) = call(
        &app,
        "POST",
        "/api/forum/posts",
        Some(&reader),
        Some(json!({ "title": "Lost glasses", "content": "Near the bakery" })),
    )
    .await;
    let second_id = second["id"].as_str().unwrap().to_string();

    let comments_uri = format!("/api/forum/posts/{post_id}/comments");
    for text in ["Count me in", "Same here"] {
        let (status, _) = call(&app, "POST", &comments_uri, Some(&reader), Some(json!({ "content": text }))).await;
        assert_eq!(status, StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let (status, _) = call(&app, "POST", &comments_uri, Some(&reader), Some(json!({ "content": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, posts) = call(&app, "GET", "/api/forum/posts", Some(&reader), None).await;
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    let walking = posts.iter().find(|p| p["id"] == post_id.as_str()).unwrap();
    assert_eq!(walking["comments"][0]["content"], "Count me in");
    assert_eq!(walking["comments"][1]["content"], "Same here");

    let (_, comments) = call(&app, "GET", &comments_uri, Some(&author), None).await;
    assert_eq!(comments.as_array().unwrap().len(), 2);

    let post_uri = format!("/api/forum/posts/{post_id}");
    let (status, _) = call(&app, "PUT", &post_uri, Some(&reader), Some(json!({ "title": "Hijacked" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, updated) = call(&app, "PUT", &post_uri, Some(&author), Some(json!({ "title": "Walking group (new time)" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Walking group (new time)");
    assert_eq!(updated["content"], "Tuesdays at 10 in the park");
    assert_eq!(updated["comments"].as_array().unwrap().len(), 2);

    // 评论只能由作者删除
    let comment_uri = format!("/api/forum/comments/{}", comments[0]["id"].as_str().unwrap());
    let (status, _) = call(&app, "DELETE", &comment_uri, Some(&author), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, deleted) = call(&app, "DELETE", &comment_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));
    let (status, body) = call(&app, "DELETE", &comment_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7102);

    let (status, _) = call(&app, "DELETE", &post_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "DELETE", &post_uri, Some(&author), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "GET", &post_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7101);
    let (status, _) = call(&app, "GET", &comments_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, posts) = call(&app, "GET", "/api/forum/posts", Some(&reader), None).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["id"], second_id.as_str());
    assert!(posts[0]["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_logs_are_private() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (elder_id, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (_, other) = sign_up(&app, "other@x.com", "ELDERLY").await;

    let day = 24 * HOUR;
    let now = now_millis();
    for (date, steps) in [(now - 2 * day, 3000), (now - day, 5200)] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/health",
            Some(&elder),
            Some(json!({ "date": date, "steps": steps, "sleep_hours": 7.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = call(&app, "POST", "/api/health", Some(&elder), Some(json!({ "sleep_hours": 30.0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, logs) = call(&app, "GET", "/api/health", Some(&elder), None).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["steps"], 5200);
    assert_eq!(logs[0]["user"], elder_id.as_str());

    let (_, none) = call(&app, "GET", "/api/health", Some(&other), None).await;
    assert!(none.as_array().unwrap().is_empty());

    let log_uri = format!("/api/health/{}", logs[0]["id"].as_str().unwrap());
    let (status, _) = call(&app, "GET", &log_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = call(
        &app,
        "PUT",
        &log_uri,
        Some(&elder),
        Some(json!({ "physical_activity": "30 min walk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["physical_activity"], "30 min walk");
    assert_eq!(updated["steps"], 5200);

    let (status, _) = call(&app, "DELETE", &log_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "DELETE", &log_uri, Some(&elder), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "GET", &log_uri, Some(&elder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7201);

    // liveness probe is unaffected by the /api/health routes
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_check_in_records_location() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (elder_id, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;

    let before = now_millis();
    let (status, check_in) = call(
        &app,
        "POST",
        "/api/checkin",
        Some(&elder),
        Some(json!({ "latitude": 48.85, "longitude": 2.35 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{check_in}");
    assert_eq!(check_in["user"], elder_id.as_str());
    assert!(check_in["check_in_time"].as_i64().unwrap() >= before);

    let (status, _) = call(
        &app,
        "POST",
        "/api/checkin",
        Some(&elder),
        Some(json!({ "latitude": 123.0, "longitude": 2.35 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = call(&app, "GET", "/api/checkin", Some(&elder), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, "POST", "/api/checkin", None, Some(json!({ "latitude": 0.0, "longitude": 0.0 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ratings_average() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (volunteer_id, volunteer) = sign_up(&app, "vol@x.com", "VOLUNTEER").await;
    let (_, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (_, family) = sign_up(&app, "family@x.com", "FAMILY").await;

    let summary_uri = format!("/api/ratings/{volunteer_id}");
    let (status, empty) = call(&app, "GET", &summary_uri, Some(&elder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({ "average": 0.0, "count": 0 }));

    for (token, value) in [(&elder, 5), (&family, 4)] {
        let (status, rating) = call(
            &app,
            "POST",
            "/api/ratings",
            Some(token),
            Some(json!({ "rated_user_id": volunteer_id, "value": value, "comment": "kind and on time" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{rating}");
        assert_eq!(rating["rated_user"], volunteer_id.as_str());
    }

    let (status, body) = call(
        &app,
        "POST",
        "/api/ratings",
        Some(&elder),
        Some(json!({ "rated_user_id": volunteer_id, "value": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7301);

    let (status, body) = call(
        &app,
        "POST",
        "/api/ratings",
        Some(&volunteer),
        Some(json!({ "rated_user_id": volunteer_id, "value": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7302);

    let (status, body) = call(
        &app,
        "POST",
        "/api/ratings",
        Some(&elder),
        Some(json!({ "rated_user_id": "user:ghost", "value": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (_, summary) = call(&app, "GET", &summary_uri, Some(&elder), None).await;
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["average"], 4.5);
}

#[tokio::test]
async fn test_voice_command_history() {
    let (state, _t, _dir) = test_state().await;
    let app = build_app(&state).with_state(state);

    let (_, elder) = sign_up(&app, "elder@x.com", "ELDERLY").await;
    let (_, other) = sign_up(&app, "other@x.com", "ELDERLY").await;

    for text in ["call my daughter", "what is on today"] {
        let (status, command) = call(&app, "POST", "/api/voice", Some(&elder), Some(json!({ "command_text": text }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(command["command_text"], text);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let (status, body) = call(&app, "POST", "/api/voice", Some(&elder), Some(json!({ "command_text": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (_, history) = call(&app, "GET", "/api/voice", Some(&elder), None).await;
    let texts: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["command_text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["what is on today", "call my daughter"]);

    let (_, none) = call(&app, "GET", "/api/voice", Some(&other), None).await;
    assert!(none.as_array().unwrap().is_empty());
}
