pub mod embedding;
pub mod factory;
pub mod places;
pub mod repositories;
