use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AttendanceRepository, EmbeddingProvider, EventRepository, MessageRepository,
    PlaceRepository, PlacesProvider, UserRepository, VisitRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub place_repo: Arc<dyn PlaceRepository>,
    pub visit_repo: Arc<dyn VisitRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub places_provider: Arc<dyn PlacesProvider>,
}
