use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{
    requests::ResearchQuery,
    responses::{ResearchEventItem, ResearchPlaceItem, ResearchResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{event::Event, point::Point};
use crate::domain::services::{research, similarity};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_place_types(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let types = state.place_repo.distinct_types().await?;
    Ok(Json(types))
}

fn parse_circle(
    lat: Option<f64>,
    lon: Option<f64>,
    radius: Option<f64>,
    label: &str,
) -> Result<Option<(Point, f64)>, AppError> {
    match (lat, lon, radius) {
        (None, None, None) => Ok(None),
        (Some(lat), Some(lon), Some(radius)) => {
            let point = Point::new(lat, lon)
                .ok_or_else(|| AppError::Validation(format!("{} coordinates are out of range", label)))?;
            if radius < 0.0 {
                return Err(AppError::Validation(format!("{} radius cannot be negative", label)));
            }
            Ok(Some((point, radius)))
        }
        _ => Err(AppError::Validation(format!(
            "{} filters require lat, lon, and radius together",
            label
        ))),
    }
}

async fn resolve_events(
    state: &AppState,
    params: &ResearchQuery,
    event_circle: Option<(Point, f64)>,
) -> Result<Vec<Event>, AppError> {
    // An explicit id short-circuits the filter pipeline; a missing event just
    // yields an empty axis.
    if let Some(eventid) = &params.eventid {
        return Ok(state.event_repo.find_by_id(eventid).await?.into_iter().collect());
    }

    let earliest = params
        .start
        .map(|d| d.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).and_utc());
    let latest = params
        .end
        .map(|d| d.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()).and_utc());

    let mut events =
        research::filter_events(state.event_repo.list().await?, earliest, latest, event_circle);

    // Keyword relevance here is threshold-based, unlike the consumer search
    // path which ranks instead.
    let query = params
        .eventquery
        .as_deref()
        .map(similarity::normalize_query)
        .filter(|q| !q.is_empty());
    if let Some(query) = query {
        let query_embedding = state.embedding_provider.embed(&query).await?;
        events.retain(|event| match &event.embedding {
            Some(embedding) => {
                similarity::cosine(&query_embedding, &embedding.0) >= similarity::RELEVANCE_THRESHOLD
            }
            None => false,
        });
    }

    Ok(events)
}

pub async fn get_research_info(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(params): Query<ResearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event_circle = parse_circle(params.eventlat, params.eventlon, params.eventrad, "Event")?;
    let place_circle = parse_circle(params.placelat, params.placelon, params.placerad, "Place")?;

    let events = resolve_events(&state, &params, event_circle).await?;
    let event_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();

    let mut places = Vec::new();
    for place in state.place_repo.list_visited_by_events(&event_ids).await? {
        if let Some((origin, radius)) = &place_circle {
            if origin.distance_miles(&place.coords()) > *radius {
                continue;
            }
        }
        let types = state.place_repo.list_types(&place.id).await?;
        if let Some(placetype) = &params.placetype {
            if !types.contains(placetype) {
                continue;
            }
        }
        places.push(ResearchPlaceItem {
            id: place.id.clone(),
            name: place.name.clone(),
            coords: place.coords(),
            types,
        });
    }

    let place_ids: Vec<String> = places.iter().map(|p| p.id.clone()).collect();
    let records = state.visit_repo.list_for(&event_ids, &place_ids).await?;
    let visits = research::build_matrix(&event_ids, &place_ids, &records);

    info!(
        "Research query crossed {} event(s) with {} place(s)",
        event_ids.len(),
        place_ids.len()
    );

    Ok(Json(ResearchResponse {
        events: events
            .into_iter()
            .map(|e| ResearchEventItem { id: e.id, displayname: e.displayname })
            .collect(),
        places,
        visits,
    }))
}
