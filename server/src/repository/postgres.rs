use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

use super::{EventRepository, Page, PageRequest};
use crate::models::{Event, EventStatus};
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "id, name, description, begin_enrollment_date_time, \
     close_enrollment_date_time, begin_event_date_time, end_event_date_time, location, \
     base_price, max_price, limit_of_enrollment, offline, free, event_status";

#[derive(Debug, FromRow)]
struct EventRow {
    id: i32,
    name: String,
    description: String,
    begin_enrollment_date_time: Option<NaiveDateTime>,
    close_enrollment_date_time: Option<NaiveDateTime>,
    begin_event_date_time: Option<NaiveDateTime>,
    end_event_date_time: Option<NaiveDateTime>,
    location: Option<String>,
    base_price: i32,
    max_price: i32,
    limit_of_enrollment: i32,
    offline: bool,
    free: bool,
    event_status: String,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_status = row
            .event_status
            .parse::<EventStatus>()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Event {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            begin_enrollment_date_time: row.begin_enrollment_date_time,
            close_enrollment_date_time: row.close_enrollment_date_time,
            begin_event_date_time: row.begin_event_date_time,
            end_event_date_time: row.end_event_date_time,
            location: row.location,
            base_price: row.base_price,
            max_price: row.max_price,
            limit_of_enrollment: row.limit_of_enrollment,
            offline: row.offline,
            free: row.free,
            event_status,
        })
    }
}

/// Event storage backed by a Postgres `events` table.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, event: &Event) -> Result<EventRow, AppError> {
        let sql = format!(
            "INSERT INTO events (name, description, begin_enrollment_date_time, \
             close_enrollment_date_time, begin_event_date_time, end_event_date_time, location, \
             base_price, max_price, limit_of_enrollment, offline, free, event_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {}",
            EVENT_COLUMNS
        );

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.begin_enrollment_date_time)
            .bind(event.close_enrollment_date_time)
            .bind(event.begin_event_date_time)
            .bind(event.end_event_date_time)
            .bind(&event.location)
            .bind(event.base_price)
            .bind(event.max_price)
            .bind(event.limit_of_enrollment)
            .bind(event.offline)
            .bind(event.free)
            .bind(event.event_status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: i32, event: &Event) -> Result<EventRow, AppError> {
        let sql = format!(
            "UPDATE events SET name = $2, description = $3, begin_enrollment_date_time = $4, \
             close_enrollment_date_time = $5, begin_event_date_time = $6, \
             end_event_date_time = $7, location = $8, base_price = $9, max_price = $10, \
             limit_of_enrollment = $11, offline = $12, free = $13, event_status = $14 \
             WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.begin_enrollment_date_time)
            .bind(event.close_enrollment_date_time)
            .bind(event.begin_event_date_time)
            .bind(event.end_event_date_time)
            .bind(&event.location)
            .bind(event.base_price)
            .bind(event.max_price)
            .bind(event.limit_of_enrollment)
            .bind(event.offline)
            .bind(event.free)
            .bind(event.event_status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", id)))
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(&self, event: Event) -> Result<Event, AppError> {
        let row = match event.id {
            Some(id) => self.update(id, &event).await?,
            None => self.insert(&event).await?,
        };
        tracing::debug!(event_id = row.id, "Saved event");
        Event::try_from(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, AppError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Event>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM events ORDER BY id LIMIT $1 OFFSET $2",
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(i64::from(request.size))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let content = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            content,
            number: request.number,
            size: request.size,
            total_elements: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(event_status: &str) -> EventRow {
        EventRow {
            id: 9,
            name: "Spring".to_string(),
            description: "REST API".to_string(),
            begin_enrollment_date_time: None,
            close_enrollment_date_time: None,
            begin_event_date_time: None,
            end_event_date_time: None,
            location: Some("강남역".to_string()),
            base_price: 100,
            max_price: 200,
            limit_of_enrollment: 100,
            offline: true,
            free: false,
            event_status: event_status.to_string(),
        }
    }

    #[test]
    fn test_row_maps_to_event() {
        let event = Event::try_from(row("PUBLISHED")).unwrap();
        assert_eq!(event.id, Some(9));
        assert_eq!(event.event_status, EventStatus::Published);
        assert!(event.offline);
    }

    #[test]
    fn test_row_with_unknown_status_is_rejected() {
        assert!(matches!(
            Event::try_from(row("ARCHIVED")),
            Err(AppError::InternalServerError(_))
        ));
    }

    /// Needs a reachable Postgres; run with `DATABASE_URL=... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_save_find_and_page_against_database() {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        let repo = PgEventRepository::new(pool);

        let mut event = Event {
            name: "Spring".to_string(),
            description: "REST API".to_string(),
            location: Some("강남역".to_string()),
            base_price: 100,
            max_price: 200,
            ..Event::default()
        };
        event.derive_flags();

        let created = repo.save(event).await.unwrap();
        let id = created.id.unwrap();
        assert!(created.offline);
        assert_eq!(created.event_status, EventStatus::Draft);

        let mut changed = created.clone();
        changed.name = "Updated".to_string();
        changed.location = None;
        changed.derive_flags();
        let updated = repo.save(changed).await.unwrap();
        assert_eq!(updated.id, Some(id));
        assert!(!updated.offline);

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Updated");

        let missing = Event {
            id: Some(i32::MAX),
            ..Event::default()
        };
        assert!(matches!(repo.save(missing).await, Err(AppError::NotFound(_))));

        let page = repo.find_page(PageRequest::new(Some(0), Some(1))).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert!(page.total_elements >= 1);
    }
}
