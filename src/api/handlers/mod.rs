pub mod auth;
pub mod event;
pub mod health;
pub mod message;
pub mod recommend;
pub mod research;
pub mod search;
