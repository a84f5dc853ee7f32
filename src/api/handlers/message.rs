use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateMessageRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::message::NewMessage;
use crate::domain::services::message_service;
use crate::error::AppError;
use crate::state::AppState;

async fn require_attendee(state: &AppState, user_id: &str, event_id: &str) -> Result<(), AppError> {
    if state.event_repo.find_by_id(event_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {} not found", event_id)));
    }
    if !state.attendance_repo.is_attendee(user_id, event_id).await? {
        return Err(AppError::Forbidden("Only attendees can use the event chat".into()));
    }
    Ok(())
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("Message body must not be empty".into()));
    }

    require_attendee(&state, &user.id, &event_id).await?;

    let message = NewMessage::new(event_id.clone(), user.id.clone(), payload.body);
    let saved = message_service::append_with_retry(&state.message_repo, message).await?;

    info!("Message {} appended to event {} at seq {}", saved.id, event_id, saved.seq);

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_attendee(&state, &user.id, &event_id).await?;
    let messages = state.message_repo.list_by_event(&event_id).await?;
    Ok(Json(messages))
}
