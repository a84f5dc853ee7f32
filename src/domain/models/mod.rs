pub mod event;
pub mod message;
pub mod place;
pub mod point;
pub mod user;
pub mod visit;
