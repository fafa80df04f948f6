use std::sync::Arc;

use crate::hal::LinkBuilder;
use crate::repository::{EventRepository, InMemoryEventRepository};

/// Shared by every handler; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub links: LinkBuilder,
}

impl AppState {
    pub fn new(events: Arc<dyn EventRepository>, links: LinkBuilder) -> Self {
        Self { events, links }
    }

    /// State backed by a fresh in-memory repository with relative links.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEventRepository::new()),
            LinkBuilder::default(),
        )
    }
}
