use async_trait::async_trait;

use crate::models::Event;
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Zero-based page window requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    /// Applies defaults and clamps the size into `1..=MAX_PAGE_SIZE`.
    pub fn new(number: Option<u32>, size: Option<u32>) -> Self {
        Self {
            number: number.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let pages = self.total_elements.div_ceil(u64::from(self.size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Storage for events. Ids are assigned on first save and never change.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event when it has no id yet, otherwise replaces the stored row.
    async fn save(&self, event: Event) -> Result<Event, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, AppError>;

    /// Returns one page of events ordered by id.
    async fn find_page(&self, request: PageRequest) -> Result<Page<Event>, AppError>;
}
