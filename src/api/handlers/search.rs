use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{requests::SearchEventsQuery, responses::EventSearchItem};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::point::Point;
use crate::domain::services::search::{self, SearchCriteria};
use crate::error::AppError;
use crate::state::AppState;

pub async fn search_events(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(params): Query<SearchEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let location = match (params.lat, params.lon) {
        (None, None) => None,
        (Some(lat), Some(lon)) => Some(
            Point::new(lat, lon)
                .ok_or_else(|| AppError::Validation("Coordinates are out of range".into()))?,
        ),
        _ => return Err(AppError::Validation("Both lat and lon must be given together".into())),
    };

    // Date bounds widen to whole days: earliest from midnight, latest to 23:59.
    let earliest = params
        .earliest
        .map(|d| d.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).and_utc());
    let latest = params
        .latest
        .map(|d| d.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()).and_utc());

    let criteria = SearchCriteria::build(params.q, earliest, latest, location, params.radius)?;

    // Pure location searches only ever rank events that carry coordinates, so
    // restrict the scan server-side.
    let candidates = if criteria.query.is_none() && criteria.location.is_some() {
        state.event_repo.list_with_coords().await?
    } else {
        state.event_repo.list().await?
    };

    let mut results = search::filter(candidates, &criteria);

    match &criteria.query {
        Some(query) if results.len() >= 2 => {
            // One embedding per request, however many candidates.
            let query_embedding = state.embedding_provider.embed(query).await?;
            search::rank_by_similarity(&mut results, &query_embedding);
        }
        Some(_) => {}
        None => search::rank_by_distance(&mut results),
    }

    info!("Event search returned {} result(s)", results.len());

    let items: Vec<EventSearchItem> = results
        .into_iter()
        .map(|r| EventSearchItem {
            id: r.event.id.clone(),
            displayname: r.event.displayname.clone(),
            distance: r.distance_miles,
            location: r.event.coords(),
            start: r.event.start_at.map(Into::into),
            end: r.event.end_at.map(Into::into),
        })
        .collect();

    Ok(Json(items))
}
