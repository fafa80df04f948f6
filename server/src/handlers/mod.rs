use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::hal::Links;
use crate::state::AppState;
use crate::utils::response::{hal, success};

pub mod events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "event-api",
    };

    success(payload, "Health check successful").into_response()
}

#[derive(Serialize)]
struct IndexDocument {
    #[serde(rename = "_links")]
    links: Links,
}

/// API root; the entry point for link discovery.
pub async fn index(State(state): State<AppState>) -> Response {
    hal(
        StatusCode::OK,
        IndexDocument {
            links: state.links.index_links(),
        },
    )
}
