use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub displayname: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub displayname: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// "HH:MM"; defaults to 00:00 when omitted.
    pub start_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    /// "HH:MM"; defaults to 23:59 when omitted.
    pub end_time: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub displayname: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Deserialize)]
pub struct CheckinRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct SearchEventsQuery {
    pub q: Option<String>,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Deserialize)]
pub struct RecommendQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Miles; a preference passed to the provider as a bias circle.
    pub rad: Option<f64>,
}

#[derive(Deserialize)]
pub struct ResearchQuery {
    pub eventid: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub eventquery: Option<String>,
    pub eventlat: Option<f64>,
    pub eventlon: Option<f64>,
    pub eventrad: Option<f64>,
    pub placetype: Option<String>,
    pub placelat: Option<f64>,
    pub placelon: Option<f64>,
    pub placerad: Option<f64>,
}
