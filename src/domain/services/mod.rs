pub mod geo;
pub mod message_service;
pub mod recommend;
pub mod research;
pub mod search;
pub mod similarity;
pub mod validation;
