pub mod postgres_attendance_repo;
pub mod postgres_event_repo;
pub mod postgres_message_repo;
pub mod postgres_place_repo;
pub mod postgres_user_repo;
pub mod postgres_visit_repo;
pub mod sqlite_attendance_repo;
pub mod sqlite_event_repo;
pub mod sqlite_message_repo;
pub mod sqlite_place_repo;
pub mod sqlite_user_repo;
pub mod sqlite_visit_repo;
