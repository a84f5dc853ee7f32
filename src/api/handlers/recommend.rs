use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{requests::RecommendQuery, responses::RecommendationItem};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::point::Point;
use crate::domain::services::{geo, recommend, similarity};
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_RADIUS_MILES: f64 = 10.0;

pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(params): Query<RecommendQuery>,
) -> Result<impl IntoResponse, AppError> {
    let category = params
        .q
        .map(|q| similarity::normalize_query(&q))
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("A search category is required".into()))?;

    let origin = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Point::new(lat, lon)
            .ok_or_else(|| AppError::Validation("Coordinates are out of range".into()))?,
        _ => return Err(AppError::Validation("lat and lon are required".into())),
    };

    let radius_miles = params.rad.unwrap_or(DEFAULT_RADIUS_MILES);
    if radius_miles < 0.0 {
        return Err(AppError::Validation("Search radius cannot be negative".into()));
    }

    let candidates = state
        .places_provider
        .text_search(&category, &origin, geo::miles_to_meters(radius_miles))
        .await?;

    // Intentional side effect of a read: cache the external lookups.
    for candidate in &candidates {
        state.place_repo.upsert(candidate).await?;
    }

    let attended = state.attendance_repo.event_ids_for_user(&user.id).await?;
    let visit_totals = state.visit_repo.sum_by_place(&attended).await?;

    let ranked = recommend::rank(candidates, &visit_totals);

    info!("Recommending {} place(s) for '{}'", ranked.len(), category);

    let items: Vec<RecommendationItem> = ranked
        .iter()
        .map(|p| RecommendationItem {
            name: p.candidate.name.clone(),
            address: p.candidate.address.clone(),
            location: p.candidate.coords,
            distance: recommend::distance_from(&origin, p),
        })
        .collect();

    Ok(Json(items))
}
