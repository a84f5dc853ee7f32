mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, auth: &str, payload: Value) -> String {
    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await["id"].as_str().unwrap().to_string()
}

async fn search(app: &TestApp, auth: &str, query: &str) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/search?{}", query))
            .header(header::AUTHORIZATION, auth)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let status = response.status();
    (status, parse_body(response).await)
}

#[tokio::test]
async fn test_date_window_overlaps_event_interval() {
    let app = TestApp::new().await;
    let (_, auth) = app.register("alice", "Str0ng!pass").await;

    create_event(&app, &auth, json!({
        "displayname": "jazz",
        "start_date": "2024-06-01",
        "end_date": "2024-06-03"
    })).await;

    // A window inside the event's interval overlaps it.
    let (status, body) = search(&app, &auth, "q=jazz&earliest=2024-06-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // A window entirely after the event does not.
    let (status, body) = search(&app, &auth, "q=jazz&earliest=2024-06-04").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Nor one entirely before it.
    let (status, body) = search(&app, &auth, "q=jazz&latest=2024-05-30").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_event_without_dates_always_passes_the_window() {
    let app = TestApp::new().await;
    let (_, auth) = app.register("alice", "Str0ng!pass").await;

    create_event(&app, &auth, json!({"displayname": "jazz"})).await;

    let (status, body) = search(&app, &auth, "q=jazz&earliest=2030-01-01&latest=2030-01-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_location_search_filters_by_radius_and_sorts_by_distance() {
    let app = TestApp::new().await;
    let (_, auth) = app.register("alice", "Str0ng!pass").await;

    // Roughly 7, 14 and 70 miles north of the origin.
    create_event(&app, &auth, json!({"displayname": "mid", "lat": 40.2, "lon": -74.0})).await;
    create_event(&app, &auth, json!({"displayname": "close", "lat": 40.1, "lon": -74.0})).await;
    create_event(&app, &auth, json!({"displayname": "far", "lat": 41.0, "lon": -74.0})).await;
    create_event(&app, &auth, json!({"displayname": "nowhere"})).await;

    let (status, body) = search(&app, &auth, "lat=40.0&lon=-74.0&radius=20").await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i["displayname"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["close", "mid"]);

    let distances: Vec<f64> = items.iter().map(|i| i["distance"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(distances.iter().all(|d| *d <= 20.0));
}

#[tokio::test]
async fn test_keyword_search_ranks_by_relevance_without_dropping_far_events() {
    let app = TestApp::new().await;
    let (_, auth) = app.register("alice", "Str0ng!pass").await;

    create_event(&app, &auth, json!({"displayname": "picnic", "lat": 45.0, "lon": -74.0})).await;
    create_event(&app, &auth, json!({"displayname": "jazz", "lat": 40.0, "lon": -74.0})).await;

    // With a query, the radius only biases; the far event is still returned.
    let (status, body) = search(&app, &auth, "q=jazz&lat=40.0&lon=-74.0&radius=5").await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["displayname"], "jazz");
    assert!(items[0]["distance"].as_f64().unwrap() < 1.0);
}

#[tokio::test]
async fn test_search_input_validation() {
    let app = TestApp::new().await;
    let (_, auth) = app.register("alice", "Str0ng!pass").await;

    // Negative radius.
    let (status, _) = search(&app, &auth, "q=jazz&lat=40.0&lon=-74.0&radius=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Radius without a location.
    let (status, _) = search(&app, &auth, "q=jazz&radius=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // lat without lon.
    let (status, _) = search(&app, &auth, "q=jazz&lat=40.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither query nor location.
    let (status, _) = search(&app, &auth, "earliest=2024-06-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Whitespace-only query with no location.
    let (status, _) = search(&app, &auth, "q=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
