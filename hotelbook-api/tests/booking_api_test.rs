use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use hotelbook_api::{app, middleware::issue_token, AppState, AuthConfig};
use hotelbook_core::InMemoryStore;
use hotelbook_shared::TicketStatus;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn setup() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        AuthConfig { secret: SECRET.to_string() },
    );
    (app(state), store)
}

/// Issue a token and open a session for it
async fn sign_in(store: &InMemoryStore, user_id: i32) -> String {
    let token = issue_token(SECRET, user_id, 3600).unwrap();
    store.add_session(user_id, &token).await;
    token
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _) = setup();
    let (status, body) = send(&app, request("GET", "/booking", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (app, _) = setup();
    let (status, _) = send(&app, request("GET", "/booking", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_without_session_is_unauthorized() {
    let (app, _) = setup();
    let token = issue_token(SECRET, 1, 3600).unwrap();
    let (status, _) = send(&app, request("GET", "/booking", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let (app, store) = setup();
    let token = issue_token("someone-else", 1, 3600).unwrap();
    store.add_session(1, &token).await;

    let (status, _) = send(&app, request("GET", "/booking", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_put_requires_token() {
    let (app, _) = setup();
    let (status, _) = send(&app, request("PUT", "/booking/1", None, Some(json!({ "roomId": 1 })))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// GET /booking
// ============================================================================

#[tokio::test]
async fn test_get_without_booking_is_not_found() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;

    let (status, _) = send(&app, request("GET", "/booking", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_returns_booking_with_room() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room = store.add_room(3, "Suite", 2).await;
    let booking = store.add_booking(1, room.id).await;

    let (status, body) = send(&app, request("GET", "/booking", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], booking.id);
    assert_eq!(body["Room"]["id"], room.id);
    assert_eq!(body["Room"]["name"], "Suite");
    assert_eq!(body["Room"]["hotelId"], 3);
    assert_eq!(body["Room"]["capacity"], 2);
}

// ============================================================================
// POST /booking
// ============================================================================

#[tokio::test]
async fn test_post_creates_booking_for_eligible_user() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;
    let room = store.add_room(1, "Double", 2).await;

    let (status, body) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room.id }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let booking_id = body["bookingId"].as_i64().unwrap();

    let (status, body) = send(&app, request("GET", "/booking", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), booking_id);
    assert_eq!(body["Room"]["id"], room.id);
}

#[tokio::test]
async fn test_second_post_by_same_user_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;
    let room_a = store.add_room(1, "A", 2).await;
    let room_b = store.add_room(1, "B", 2).await;

    let (status, _) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room_a.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room_b.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "user already has a booking");
    assert_eq!(store.occupancy(room_a.id).await, 1);
    assert_eq!(store.occupancy(room_b.id).await, 0);
}

#[tokio::test]
async fn test_post_without_room_id_is_not_found() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;

    let (status, _) = send(&app, request("POST", "/booking", Some(&token), Some(json!({})))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_unknown_room_is_not_found() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;

    let (status, _) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": 9999 }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_full_room_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;
    let room = store.add_room(1, "Single", 1).await;
    store.add_booking(2, room.id).await;

    let (status, body) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "room has no vacancy");
}

#[tokio::test]
async fn test_post_zero_capacity_room_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    store.add_ticket(1, TicketStatus::Paid, false, true).await;
    let room = store.add_room(1, "Broom closet", 0).await;

    let (status, _) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_with_ineligible_ticket_is_forbidden() {
    let cases = [
        (TicketStatus::Reserved, false, true),
        (TicketStatus::Paid, true, true),
        (TicketStatus::Paid, false, false),
    ];

    for (ticket_status, is_remote, includes_hotel) in cases {
        let (app, store) = setup();
        let token = sign_in(&store, 1).await;
        store.add_ticket(1, ticket_status, is_remote, includes_hotel).await;
        let room = store.add_room(1, "Double", 2).await;

        let (status, _) = send(
            &app,
            request("POST", "/booking", Some(&token), Some(json!({ "roomId": room.id }))),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(store.occupancy(room.id).await, 0);
    }
}

#[tokio::test]
async fn test_post_without_ticket_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room = store.add_room(1, "Double", 2).await;

    let (status, _) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": room.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_malformed_body_is_bad_request() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;

    let (status, _) = send(
        &app,
        request("POST", "/booking", Some(&token), Some(json!({ "roomId": "one" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// PUT /booking/:booking_id
// ============================================================================

#[tokio::test]
async fn test_put_moves_booking_to_free_room() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room_a = store.add_room(1, "A", 1).await;
    let room_b = store.add_room(1, "B", 1).await;
    let booking = store.add_booking(1, room_a.id).await;

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/booking/{}", booking.id),
            Some(&token),
            Some(json!({ "roomId": room_b.id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookingId"], booking.id);

    let (_, body) = send(&app, request("GET", "/booking", Some(&token), None)).await;
    assert_eq!(body["Room"]["id"], room_b.id);
}

#[tokio::test]
async fn test_put_without_booking_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room = store.add_room(1, "Double", 2).await;

    let (status, _) = send(
        &app,
        request("PUT", "/booking/1", Some(&token), Some(json!({ "roomId": room.id }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_into_full_room_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room_a = store.add_room(1, "A", 1).await;
    let room_b = store.add_room(1, "B", 1).await;
    let booking = store.add_booking(1, room_a.id).await;
    store.add_booking(2, room_b.id).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/booking/{}", booking.id),
            Some(&token),
            Some(json!({ "roomId": room_b.id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_unknown_room_is_not_found() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room = store.add_room(1, "A", 1).await;
    let booking = store.add_booking(1, room.id).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/booking/{}", booking.id),
            Some(&token),
            Some(json!({ "roomId": 9999 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_on_another_users_booking_is_forbidden() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;
    let room_a = store.add_room(1, "A", 2).await;
    let room_b = store.add_room(1, "B", 2).await;
    store.add_booking(1, room_a.id).await;
    let other = store.add_booking(2, room_a.id).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/booking/{}", other.id),
            Some(&token),
            Some(json!({ "roomId": room_b.id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.occupancy(room_b.id).await, 0);
}

#[tokio::test]
async fn test_put_with_non_numeric_booking_id_is_bad_request() {
    let (app, store) = setup();
    let token = sign_in(&store, 1).await;

    let (status, _) = send(
        &app,
        request("PUT", "/booking/abc", Some(&token), Some(json!({ "roomId": 1 }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
