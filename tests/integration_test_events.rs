mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{candidate, MockPlacesProvider, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, auth: &str, payload: Value) -> Value {
    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await
}

#[tokio::test]
async fn test_event_lifecycle() {
    let app = TestApp::new().await;
    let (host_id, host) = app.register("host", "Str0ng!pass").await;
    let (_, other) = app.register("other", "Str0ng!pass").await;

    let event = create_event(&app, &host, json!({
        "displayname": "jazz",
        "description": "an evening of jazz",
        "start_date": "2024-06-01", "start_time": "19:00",
        "end_date": "2024-06-01", "end_time": "23:00",
        "lat": 40.0, "lon": -74.0
    })).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    assert_eq!(event["host"], host_id.as_str());

    // Readable by any authenticated user.
    let fetched = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &other)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(parse_body(fetched).await["displayname"], "jazz");

    // Only the host can modify.
    let forbidden = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &other)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"displayname": "hijacked"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let patched = app.router.clone().oneshot(
        Request::builder().method("PATCH").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &host)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"displayname": "chess"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(parse_body(patched).await["displayname"], "chess");

    // Only the host can delete.
    let forbidden = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &other)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &host)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}", event_id))
            .header(header::AUTHORIZATION, &host)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_window_cannot_end_before_start() {
    let app = TestApp::new().await;
    let (_, host) = app.register("host", "Str0ng!pass").await;

    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::AUTHORIZATION, &host)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "displayname": "backwards",
                "start_date": "2024-06-02",
                "end_date": "2024-06-01"
            }).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let errors = parse_body(response).await;
    assert!(errors.as_array().unwrap().iter().any(|e| e["field"] == "end"));
}

#[tokio::test]
async fn test_attend_and_leave() {
    let app = TestApp::new().await;
    let (_, host) = app.register("host", "Str0ng!pass").await;
    let (guest_id, guest) = app.register("guest", "Str0ng!pass").await;

    let event = create_event(&app, &host, json!({"displayname": "picnic"})).await;
    let event_id = event["id"].as_str().unwrap().to_string();

    let attend = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/attend", event_id))
            .header(header::AUTHORIZATION, &guest)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(attend.status(), StatusCode::NO_CONTENT);
    assert!(app.state.attendance_repo.is_attendee(&guest_id, &event_id).await.unwrap());

    let leave = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/events/{}/attend", event_id))
            .header(header::AUTHORIZATION, &guest)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(leave.status(), StatusCode::NO_CONTENT);
    assert!(!app.state.attendance_repo.is_attendee(&guest_id, &event_id).await.unwrap());

    let missing = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events/no-such-event/attend")
            .header(header::AUTHORIZATION, &guest)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkin_resolves_place_and_backfills_name() {
    let places = MockPlacesProvider {
        geocode_results: vec![candidate("place-1", None, 40.0, -74.0, &["cafe"])],
        details: vec![candidate("place-1", Some("Corner Cafe"), 40.0, -74.0, &["cafe"])],
        ..Default::default()
    };
    let app = TestApp::with_places(places).await;
    let (_, host) = app.register("host", "Str0ng!pass").await;
    let (_, stranger) = app.register("stranger", "Str0ng!pass").await;

    let event = create_event(&app, &host, json!({"displayname": "chess"})).await;
    let event_id = event["id"].as_str().unwrap().to_string();

    // The host attends their own event and may check in; a stranger may not.
    let forbidden = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/checkin", event_id))
            .header(header::AUTHORIZATION, &stranger)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"lat": 40.0, "lon": -74.0}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let checkin = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/checkin", event_id))
            .header(header::AUTHORIZATION, &host)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"lat": 40.0, "lon": -74.0}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(checkin.status(), StatusCode::OK);
    let body = parse_body(checkin).await;
    assert_eq!(body["place_id"], "place-1");
    assert_eq!(body["place_name"], "Corner Cafe");

    // The geocode result had no name; the details lookup filled it in.
    let stored = app.state.place_repo.find_by_id("place-1").await.unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Corner Cafe"));

    // A second check-in increments the counter.
    let again = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/checkin", event_id))
            .header(header::AUTHORIZATION, &host)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"lat": 40.0, "lon": -74.0}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(again.status(), StatusCode::OK);

    let records = app.state.visit_repo
        .list_for(&[event_id.clone()], &["place-1".to_string()])
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].visits, 2);
}
