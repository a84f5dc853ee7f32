use crate::domain::models::{place::PlaceCandidate, point::Point};
use crate::domain::ports::PlacesProvider;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::error;

/// Nearby lookups resolve "which place is the user standing at"; a tight
/// circle is enough.
const REVERSE_GEOCODE_RADIUS_METERS: f64 = 150.0;

const SEARCH_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress,places.location,places.types";
const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,location,types";

pub struct GooglePlacesProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    places: Vec<ApiPlace>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPlace {
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    location: ApiLatLng,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Deserialize)]
struct ApiLatLng {
    latitude: f64,
    longitude: f64,
}

impl From<ApiPlace> for PlaceCandidate {
    fn from(p: ApiPlace) -> Self {
        PlaceCandidate {
            id: p.id,
            name: p.display_name.map(|n| n.text),
            address: p.formatted_address,
            coords: Point { lat: p.location.latitude, lon: p.location.longitude },
            types: p.types,
        }
    }
}

impl GooglePlacesProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            api_key,
        }
    }

    async fn post_search(&self, path: &str, payload: serde_json::Value) -> Result<Vec<PlaceCandidate>, AppError> {
        let response = self.client.post(format!("{}/{}", self.base_url, path))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Places provider unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Places search failed: {} - {}", status, text);
            return Err(AppError::Upstream(format!("Places provider: {}", status)));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            error!("Failed to parse places response: {:?}", e);
            AppError::Upstream("Malformed places response".to_string())
        })?;

        Ok(body.places.into_iter().map(PlaceCandidate::from).collect())
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn text_search(
        &self,
        query: &str,
        bias: &Point,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>, AppError> {
        self.post_search(
            "places:searchText",
            json!({
                "textQuery": query,
                "locationBias": {
                    "circle": {
                        "center": { "latitude": bias.lat, "longitude": bias.lon },
                        "radius": radius_meters,
                    }
                }
            }),
        )
        .await
    }

    async fn reverse_geocode(&self, point: &Point) -> Result<Vec<PlaceCandidate>, AppError> {
        self.post_search(
            "places:searchNearby",
            json!({
                "locationRestriction": {
                    "circle": {
                        "center": { "latitude": point.lat, "longitude": point.lon },
                        "radius": REVERSE_GEOCODE_RADIUS_METERS,
                    }
                },
                "rankPreference": "DISTANCE",
            }),
        )
        .await
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceCandidate>, AppError> {
        let response = self.client.get(format!("{}/places/{}", self.base_url, place_id))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Places provider unreachable: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Place details failed: {} - {}", status, text);
            return Err(AppError::Upstream(format!("Places provider: {}", status)));
        }

        let place: ApiPlace = response.json().await.map_err(|e| {
            error!("Failed to parse place details: {:?}", e);
            AppError::Upstream("Malformed place details response".to_string())
        })?;

        Ok(Some(place.into()))
    }
}
