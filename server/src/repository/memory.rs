use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EventRepository, Page, PageRequest};
use crate::models::Event;
use crate::utils::error::AppError;

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    events: BTreeMap<i32, Event>,
}

/// Process-local event storage, used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    store: RwLock<Store>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, mut event: Event) -> Result<Event, AppError> {
        let mut store = self.store.write().await;

        let id = match event.id {
            Some(id) if store.events.contains_key(&id) => id,
            Some(id) => {
                return Err(AppError::NotFound(format!(
                    "Event with id '{}' was not found",
                    id
                )))
            }
            None => {
                store.next_id += 1;
                store.next_id
            }
        };

        event.id = Some(id);
        store.events.insert(id, event.clone());
        tracing::debug!(event_id = id, "Stored event in memory");
        Ok(event)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, AppError> {
        Ok(self.store.read().await.events.get(&id).cloned())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Event>, AppError> {
        let store = self.store.read().await;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);

        let content = store
            .events
            .values()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            content,
            number: request.number,
            size: request.size,
            total_elements: store.events.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Event {
        Event {
            name: name.to_string(),
            ..Event::default()
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryEventRepository::new();

        let first = repo.save(named("first")).await.unwrap();
        let second = repo.save(named("second")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn test_save_with_id_replaces_row() {
        let repo = InMemoryEventRepository::new();
        let mut saved = repo.save(named("before")).await.unwrap();

        saved.name = "after".to_string();
        repo.save(saved).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.name, "after");
        assert_eq!(repo.find_page(PageRequest::default()).await.unwrap().total_elements, 1);
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let repo = InMemoryEventRepository::new();
        let event = Event {
            id: Some(42),
            ..Event::default()
        };
        assert!(matches!(repo.save(event).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = InMemoryEventRepository::new();
        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_page_windows_by_id() {
        let repo = InMemoryEventRepository::new();
        for i in 0..25 {
            repo.save(named(&format!("event {}", i))).await.unwrap();
        }

        let page = repo.find_page(PageRequest::new(Some(2), Some(10))).await.unwrap();

        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages(), 3);
        let ids: Vec<i32> = page.content.iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, (21..=25).collect::<Vec<_>>());
    }
}
