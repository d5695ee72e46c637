//! HTTP API handlers for persona-api

pub mod health;
pub mod persons;

pub use health::health_routes;
pub use persons::person_routes;
