//! cbi-is library interface
//!
//! Exposes the application state, router construction, and the workflow
//! internals for integration testing.

pub mod api;
pub mod capture;
pub mod clients;
pub mod error;
pub mod models;
pub mod presenter;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cbi_common::events::EventBus;

use crate::clients::ServiceClients;
use crate::workflow::WorkflowController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Exclusive owner of all inspection sessions
    pub controller: Arc<WorkflowController>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(clients: ServiceClients, event_bus: EventBus) -> Self {
        let controller = Arc::new(WorkflowController::new(clients, event_bus.clone()));
        Self {
            controller,
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// The operator UI is an external client: CORS is permissive and every
/// operator action is a JSON endpoint.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::inspection_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
