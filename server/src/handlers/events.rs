use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use crate::hal::EntityModel;
use crate::models::{Event, EventDto};
use crate::repository::PageRequest;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::ApiJson;
use crate::utils::response::{hal, hal_created};
use crate::validation::validate;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

fn check(state: &AppState, dto: &EventDto) -> Result<(), AppError> {
    validate(dto).map_err(|errors| AppError::ValidationError {
        errors,
        links: state.links.error_links(),
    })
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

/// `POST /api/events`
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<EventDto>,
) -> Result<Response, AppError> {
    check(&state, &dto)?;

    let event = state.events.save(Event::from_dto(dto)).await?;
    let id = event
        .id
        .ok_or_else(|| AppError::InternalServerError("saved event has no id".to_string()))?;

    tracing::info!(event_id = id, free = event.free, offline = event.offline, "Created event");

    let location = state.links.event(id);
    let body = EntityModel::new(event, state.links.created_event_links(id));
    Ok(hal_created(&location, body))
}

/// `GET /api/events?page=&size=`
pub async fn query_events(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let request = PageRequest::new(params.page, params.size);
    let page = state.events.find_page(request).await?;

    tracing::debug!(
        page = request.number,
        size = request.size,
        total = page.total_elements,
        "Listed events"
    );

    let body = state.links.paged_events(page, |event: &Event| event.id);
    Ok(hal(StatusCode::OK, body))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let event = state.events.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

    let body = EntityModel::new(event, state.links.event_links(id))
        .with_link("profile", state.links.profile("get"));
    Ok(hal(StatusCode::OK, body))
}

/// `PUT /api/events/{id}`
///
/// A well-formed payload for an unknown id yields 404 before any validation runs.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(dto): ApiJson<EventDto>,
) -> Result<Response, AppError> {
    let mut event = state.events.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

    check(&state, &dto)?;

    event.apply_dto(dto);
    let saved = state.events.save(event).await?;

    tracing::info!(event_id = id, free = saved.free, offline = saved.offline, "Updated event");

    let body = EntityModel::new(saved, state.links.event_links(id))
        .with_link("profile", state.links.profile("update"));
    Ok(hal(StatusCode::OK, body))
}
