use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config, SecurityHeaders};
use crate::handlers::events::{create_event, get_event, query_events, update_event};
use crate::handlers::{health_check, index};
use crate::state::AppState;

/// Event routes without middleware.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(index))
        .route("/api/events", get(query_events).post(create_event))
        .route("/api/events/:id", get(get_event).put(update_event))
        .with_state(state)
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = apply_security_headers(api_routes(state), SecurityHeaders::new(config.production));

    router
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
}
