use crate::domain::models::{
    event::Event,
    message::{Message, NewMessage},
    place::{Place, PlaceCandidate},
    point::Point,
    user::User,
    visit::VisitRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    /// Server-side restriction for pure location searches: only events that
    /// carry coordinates.
    async fn list_with_coords(&self) -> Result<Vec<Event>, AppError>;
}

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Idempotent insert: a place (and its type tags) already known is left
    /// untouched.
    async fn upsert(&self, candidate: &PlaceCandidate) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Place>, AppError>;
    /// Fills in a missing name from a details lookup; never overwrites one.
    async fn backfill_name(&self, id: &str, name: &str) -> Result<(), AppError>;
    async fn list_types(&self, place_id: &str) -> Result<Vec<String>, AppError>;
    async fn distinct_types(&self) -> Result<Vec<String>, AppError>;
    /// Places that have a visit record against any of the given events.
    async fn list_visited_by_events(&self, event_ids: &[String]) -> Result<Vec<Place>, AppError>;
}

#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Creates the (place, event) counter at 1 or increments it. Additive only.
    async fn increment(&self, place_id: &str, event_id: &str) -> Result<(), AppError>;
    /// Total visits per place, summed over the given events.
    async fn sum_by_place(&self, event_ids: &[String]) -> Result<HashMap<String, i64>, AppError>;
    async fn list_for(&self, event_ids: &[String], place_ids: &[String]) -> Result<Vec<VisitRecord>, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn add(&self, user_id: &str, event_id: &str) -> Result<(), AppError>;
    async fn remove(&self, user_id: &str, event_id: &str) -> Result<(), AppError>;
    async fn is_attendee(&self, user_id: &str, event_id: &str) -> Result<bool, AppError>;
    async fn event_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Assigns the next per-event seq inside the insert statement. A logical
    /// clock collision surfaces as a unique violation.
    async fn append(&self, message: &NewMessage) -> Result<Message, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Message>, AppError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn text_search(
        &self,
        query: &str,
        bias: &Point,
        radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>, AppError>;
    async fn reverse_geocode(&self, point: &Point) -> Result<Vec<PlaceCandidate>, AppError>;
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceCandidate>, AppError>;
}
