//! persona-api library interface
//!
//! Exposes the router and state so integration tests can drive the service
//! without binding a socket.

pub mod api;
pub mod db;
pub mod error;
pub mod query;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use persona_common::config::QueryDefaults;
use persona_sdk::NameLookup;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::PersonService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub persons: PersonService,
    /// Defaults for list requests that omit sort or paging
    pub query_defaults: Arc<QueryDefaults>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, lookup: Arc<dyn NameLookup>, query_defaults: QueryDefaults) -> Self {
        Self {
            persons: PersonService::new(db, lookup),
            query_defaults: Arc::new(query_defaults),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::person_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
