use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::hal::{Links, HAL_JSON};
use crate::validation::ValidationErrors;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

#[derive(Serialize)]
pub struct ValidationErrorDocument {
    pub errors: ValidationErrors,
    #[serde(rename = "_links")]
    pub links: Links,
}

pub fn success<T>(data: T, message: impl Into<String>) -> impl IntoResponse
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data: Some(data),
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body))
}

/// Serializes `body` as JSON and labels it `application/hal+json`.
pub fn hal<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
    response
}

/// `201 Created` HAL response with a `Location` header.
pub fn hal_created<T>(location: &str, body: T) -> Response
where
    T: Serialize,
{
    let mut response = hal(StatusCode::CREATED, body);
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Skipping invalid Location header");
        }
    }
    response
}

pub fn validation_failed(errors: ValidationErrors, links: Links) -> Response {
    hal(
        StatusCode::BAD_REQUEST,
        ValidationErrorDocument { errors, links },
    )
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_string(),
            message: message.into(),
            details,
        },
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_sets_content_type() {
        let response = hal(StatusCode::OK, serde_json::json!({"id": 1}));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            HAL_JSON
        );
    }

    #[test]
    fn test_hal_created_sets_location() {
        let response = hal_created("/api/events/1", serde_json::json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/events/1"
        );
    }
}
