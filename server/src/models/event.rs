use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    BeganEnrollment,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::BeganEnrollment => "BEGAN_ENROLLMENT",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event status '{0}'")]
pub struct UnknownEventStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownEventStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(EventStatus::Draft),
            "PUBLISHED" => Ok(EventStatus::Published),
            "BEGAN_ENROLLMENT" => Ok(EventStatus::BeganEnrollment),
            other => Err(UnknownEventStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    pub begin_event_date_time: Option<NaiveDateTime>,
    pub end_event_date_time: Option<NaiveDateTime>,
    /// Online when absent.
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub offline: bool,
    pub free: bool,
    pub event_status: EventStatus,
}

impl Event {
    /// Builds a new, unsaved event from a validated payload.
    pub fn from_dto(dto: EventDto) -> Self {
        let mut event = Event::default();
        event.apply_dto(dto);
        event
    }

    /// Copies every client-supplied field onto this event and re-derives the
    /// flags. `id` and `event_status` are left untouched.
    pub fn apply_dto(&mut self, dto: EventDto) {
        self.name = dto.name.unwrap_or_default();
        self.description = dto.description.unwrap_or_default();
        self.begin_enrollment_date_time = dto.begin_enrollment_date_time;
        self.close_enrollment_date_time = dto.close_enrollment_date_time;
        self.begin_event_date_time = dto.begin_event_date_time;
        self.end_event_date_time = dto.end_event_date_time;
        self.location = dto.location;
        self.base_price = dto.base_price.unwrap_or_default();
        self.max_price = dto.max_price.unwrap_or_default();
        self.limit_of_enrollment = dto.limit_of_enrollment.unwrap_or_default();
        self.derive_flags();
    }

    /// Recomputes `free` and `offline` from the pricing and location fields.
    pub fn derive_flags(&mut self) {
        self.free = self.base_price == 0 && self.max_price == 0;
        self.offline = self
            .location
            .as_deref()
            .is_some_and(|location| !location.trim().is_empty());
    }
}

/// Request body for creating or updating an event.
///
/// Every field is optional at the wire level so that missing values surface as
/// validation errors instead of opaque deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub begin_event_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_event_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub base_price: Option<i32>,
    #[serde(default)]
    pub max_price: Option<i32>,
    #[serde(default)]
    pub limit_of_enrollment: Option<i32>,
}
