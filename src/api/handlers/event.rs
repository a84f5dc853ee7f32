use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{
    requests::{CheckinRequest, CreateEventRequest, UpdateEventRequest},
    responses::CheckinResponse,
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{
    event::{Event, NewEventParams},
    point::Point,
};
use crate::domain::services::validation;
use crate::error::{AppError, FieldError};
use crate::state::AppState;

fn combine(date: Option<NaiveDate>, time: Option<&str>, default_time: NaiveTime) -> Result<Option<DateTime<Utc>>, FieldError> {
    let Some(date) = date else {
        return Ok(None);
    };
    let time = match time {
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| FieldError::new("time", "Times must be given as HH:MM."))?,
        None => default_time,
    };
    Ok(Some(date.and_time(time).and_utc()))
}

fn resolve_window(
    start_date: Option<NaiveDate>,
    start_time: Option<&str>,
    end_date: Option<NaiveDate>,
    end_time: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    // Missing times default to the widest window: 00:00 for start, 23:59 for
    // end. Once stored, instants are exact.
    let start = combine(start_date, start_time, NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        .unwrap_or_else(|e| {
            errors.push(e);
            None
        });
    let end = combine(end_date, end_time, NaiveTime::from_hms_opt(23, 59, 0).unwrap())
        .unwrap_or_else(|e| {
            errors.push(e);
            None
        });

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.push(FieldError::new("end", "The event cannot end before it starts."));
        }
    }

    (start, end)
}

fn resolve_coords(lat: Option<f64>, lon: Option<f64>, errors: &mut Vec<FieldError>) -> Option<Point> {
    match (lat, lon) {
        (None, None) => None,
        (Some(lat), Some(lon)) => match Point::new(lat, lon) {
            Some(point) => Some(point),
            None => {
                errors.push(FieldError::new("location", "Coordinates are out of range."));
                None
            }
        },
        _ => {
            errors.push(FieldError::new("location", "Both lat and lon must be given together."));
            None
        }
    }
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut errors = validation::validate_event_fields(
        Some(&payload.displayname),
        payload.description.as_deref(),
    );

    let (start_at, end_at) = resolve_window(
        payload.start_date,
        payload.start_time.as_deref(),
        payload.end_date,
        payload.end_time.as_deref(),
        &mut errors,
    );
    let coords = resolve_coords(payload.lat, payload.lon, &mut errors);

    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    let mut event = Event::new(NewEventParams {
        displayname: payload.displayname,
        description: payload.description,
        start_at,
        end_at,
        host: user.id.clone(),
        coords,
        embedding: None,
    });

    let embedding = state.embedding_provider.embed(&event.embedding_text()).await?;
    event.embedding = Some(sqlx::types::Json(embedding));

    let created = state.event_repo.create(&event).await?;
    state.attendance_repo.add(&user.id, &created.id).await?;

    info!("Created event {} hosted by {}", created.id, user.id);

    Ok(Json(created))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if event.host != user.id {
        return Err(AppError::Forbidden("Only the host can modify an event".into()));
    }

    let mut errors = validation::validate_event_fields(
        payload.displayname.as_deref(),
        payload.description.as_deref(),
    );

    let text_changed = payload.displayname.is_some() || payload.description.is_some();

    if let Some(displayname) = payload.displayname {
        event.displayname = displayname;
    }
    if let Some(description) = payload.description {
        event.description = Some(description);
    }

    if payload.start_date.is_some() || payload.end_date.is_some() {
        let (start_at, end_at) = resolve_window(
            payload.start_date,
            payload.start_time.as_deref(),
            payload.end_date,
            payload.end_time.as_deref(),
            &mut errors,
        );
        if start_at.is_some() {
            event.start_at = start_at;
        }
        if end_at.is_some() {
            event.end_at = end_at;
        }
    }

    if payload.lat.is_some() || payload.lon.is_some() {
        if let Some(point) = resolve_coords(payload.lat, payload.lon, &mut errors) {
            event.lat = Some(point.lat);
            event.lon = Some(point.lon);
        }
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    // Keep the stored embedding consistent with the text it derives from,
    // in the same update.
    if text_changed {
        let embedding = state.embedding_provider.embed(&event.embedding_text()).await?;
        event.embedding = Some(sqlx::types::Json(embedding));
    }

    let updated = state.event_repo.update(&event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if event.host != user.id {
        return Err(AppError::Forbidden("Only the host can delete an event".into()));
    }

    state.event_repo.delete(&event_id).await?;
    info!("Deleted event {}", event_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn attend_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.event_repo.find_by_id(&event_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {} not found", event_id)));
    }
    state.attendance_repo.add(&user.id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.attendance_repo.remove(&user.id, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Visit reporting: resolves the reporter's position to a place and bumps the
/// (place, event) counter.
pub async fn checkin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CheckinRequest>,
) -> Result<impl IntoResponse, AppError> {
    let point = Point::new(payload.lat, payload.lon)
        .ok_or_else(|| AppError::Validation("Coordinates are out of range".into()))?;

    if state.event_repo.find_by_id(&event_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {} not found", event_id)));
    }
    if !state.attendance_repo.is_attendee(&user.id, &event_id).await? {
        return Err(AppError::Forbidden("Only attendees can check in".into()));
    }

    let candidates = state.places_provider.reverse_geocode(&point).await?;
    let nearest = candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("No place found at this location".into()))?;

    state.place_repo.upsert(&nearest).await?;

    // Nearby results sometimes arrive without a display name; backfill from a
    // details lookup without overwriting anything already stored.
    let mut place_name = nearest.name.clone();
    if place_name.is_none() {
        if let Some(details) = state.places_provider.place_details(&nearest.id).await? {
            if let Some(name) = &details.name {
                state.place_repo.backfill_name(&nearest.id, name).await?;
                place_name = Some(name.clone());
            }
        }
    }

    state.visit_repo.increment(&nearest.id, &event_id).await?;

    info!("Check-in at {} for event {}", nearest.id, event_id);

    Ok(Json(CheckinResponse {
        place_id: nearest.id,
        place_name,
    }))
}
