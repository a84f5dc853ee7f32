use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{auth, event, health, message, recommend, research, search};
use crate::state::AppState;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", get(auth::login))

        // Events
        .route("/api/v1/events", post(event::create_event))
        .route("/api/v1/events/search", get(search::search_events))
        .route(
            "/api/v1/events/{event_id}",
            get(event::get_event).patch(event::update_event).delete(event::delete_event),
        )
        .route(
            "/api/v1/events/{event_id}/attend",
            post(event::attend_event).delete(event::leave_event),
        )
        .route("/api/v1/events/{event_id}/checkin", post(event::checkin))

        // Event chat
        .route(
            "/api/v1/events/{event_id}/messages",
            get(message::list_messages).post(message::post_message),
        )

        // Place recommendations
        .route("/api/v1/recommend", get(recommend::get_recommendations))

        // Research
        .route("/api/v1/research", get(research::get_research_info))
        .route("/api/v1/research/placetypes", get(research::get_place_types))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                }),
        )
        .with_state(state)
}
