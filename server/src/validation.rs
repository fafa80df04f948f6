//! Request validation for event payloads.
//!
//! Validation runs in two passes. The structural pass checks each field on its
//! own (presence, non-blank text, non-negative numbers). The semantic pass
//! compares fields against each other and only runs once every field is
//! structurally sound.

use serde::Serialize;
use serde_json::Value;

use crate::models::EventDto;

const OBJECT_NAME: &str = "eventDto";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub code: String,
    pub default_message: String,
    pub rejected_value: Value,
}

impl FieldError {
    fn new(field: &str, code: &str, message: impl Into<String>, rejected_value: Value) -> Self {
        Self {
            object_name: OBJECT_NAME.to_string(),
            field: field.to_string(),
            code: code.to_string(),
            default_message: message.into(),
            rejected_value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Validates an event payload, returning every problem found.
pub fn validate(dto: &EventDto) -> Result<(), ValidationErrors> {
    validate_fields(dto)?;
    validate_semantics(dto)
}

fn validate_fields(dto: &EventDto) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for (field, value) in [("name", &dto.name), ("description", &dto.description)] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            errors.push(FieldError::new(
                field,
                "NotEmpty",
                "must not be empty",
                json_or_null(value),
            ));
        }
    }

    for (field, value) in [
        ("beginEnrollmentDateTime", &dto.begin_enrollment_date_time),
        ("closeEnrollmentDateTime", &dto.close_enrollment_date_time),
        ("beginEventDateTime", &dto.begin_event_date_time),
        ("endEventDateTime", &dto.end_event_date_time),
    ] {
        if value.is_none() {
            errors.push(FieldError::new(field, "NotNull", "must not be null", Value::Null));
        }
    }

    for (field, value) in [
        ("basePrice", dto.base_price),
        ("maxPrice", dto.max_price),
        ("limitOfEnrollment", dto.limit_of_enrollment),
    ] {
        if let Some(v) = value.filter(|v| *v < 0) {
            errors.push(FieldError::new(
                field,
                "Min",
                "must be greater than or equal to 0",
                Value::from(v),
            ));
        }
    }

    errors.into_result()
}

fn validate_semantics(dto: &EventDto) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    // A max price of zero means there is no upper bound.
    let base_price = dto.base_price.unwrap_or_default();
    let max_price = dto.max_price.unwrap_or_default();
    if base_price > max_price && max_price != 0 {
        errors.push(FieldError::new(
            "basePrice",
            "wrongValue",
            "basePrice is greater than maxPrice",
            Value::from(base_price),
        ));
        errors.push(FieldError::new(
            "maxPrice",
            "wrongValue",
            "maxPrice is less than basePrice",
            Value::from(max_price),
        ));
    }

    if let (Some(begin_enrollment), Some(close_enrollment), Some(begin_event), Some(end_event)) = (
        dto.begin_enrollment_date_time,
        dto.close_enrollment_date_time,
        dto.begin_event_date_time,
        dto.end_event_date_time,
    ) {
        if end_event < begin_event || end_event < close_enrollment || end_event < begin_enrollment {
            errors.push(FieldError::new(
                "endEventDateTime",
                "wrongValue",
                "endEventDateTime is earlier than the event or enrollment window",
                json_or_null(&dto.end_event_date_time),
            ));
        }

        if close_enrollment < begin_enrollment {
            errors.push(FieldError::new(
                "closeEnrollmentDateTime",
                "wrongValue",
                "closeEnrollmentDateTime is earlier than beginEnrollmentDateTime",
                json_or_null(&dto.close_enrollment_date_time),
            ));
        }

        if begin_event < close_enrollment {
            errors.push(FieldError::new(
                "beginEventDateTime",
                "wrongValue",
                "beginEventDateTime is earlier than closeEnrollmentDateTime",
                json_or_null(&dto.begin_event_date_time),
            ));
        }
    }

    errors.into_result()
}

fn json_or_null<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
