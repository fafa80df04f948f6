//! HAL (`application/hal+json`) document assembly.
//!
//! Everything here is a pure function of an entity, a base URL and route
//! templates. Handlers decide which links a document carries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::repository::Page;

pub const HAL_JSON: &str = "application/hal+json";

pub const EVENTS_PATH: &str = "/api/events";
pub const INDEX_PATH: &str = "/api";
const DOCS_PATH: &str = "/docs/index.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Links keyed by relation name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.add(rel, href);
        self
    }

    pub fn add(&mut self, rel: &str, href: impl Into<String>) {
        self.0.insert(rel.to_string(), Link { href: href.into() });
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }
}

/// A single resource with its links.
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T: Serialize> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T: Serialize> EntityModel<T> {
    pub fn new(content: T, links: Links) -> Self {
        Self { content, links }
    }

    pub fn with_link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.add(rel, href);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embedded<T: Serialize> {
    #[serde(rename = "eventList", skip_serializing_if = "Vec::is_empty")]
    pub event_list: Vec<T>,
}

/// A window over a collection, with navigation links.
#[derive(Debug, Clone, Serialize)]
pub struct PagedModel<T: Serialize> {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded<T>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

/// Builds hrefs for the event resources relative to a configured base URL.
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn index(&self) -> String {
        format!("{}{}", self.base_url, INDEX_PATH)
    }

    pub fn events(&self) -> String {
        format!("{}{}", self.base_url, EVENTS_PATH)
    }

    pub fn event(&self, id: i32) -> String {
        format!("{}{}/{}", self.base_url, EVENTS_PATH, id)
    }

    fn events_page(&self, number: u32, size: u32) -> String {
        format!("{}?page={}&size={}", self.events(), number, size)
    }

    /// Documentation anchor for an event operation (`create`, `list`, `get`, `update`).
    pub fn profile(&self, operation: &str) -> String {
        format!("{}#resources-events-{}", DOCS_PATH, operation)
    }

    /// Links returned by the API root.
    pub fn index_links(&self) -> Links {
        Links::new()
            .with("self", self.index())
            .with("events", self.events())
    }

    /// Links attached to validation error documents.
    pub fn error_links(&self) -> Links {
        Links::new().with("index", self.index())
    }

    /// Self link for an event.
    pub fn event_links(&self, id: i32) -> Links {
        Links::new().with("self", self.event(id))
    }

    /// Links for a freshly created event.
    pub fn created_event_links(&self, id: i32) -> Links {
        self.event_links(id)
            .with("query-events", self.events())
            .with("update-event", self.event(id))
            .with("profile", self.profile("create"))
    }

    /// Assembles a paged collection document, each item carrying its self link.
    pub fn paged_events<T, F>(&self, page: Page<T>, id_of: F) -> PagedModel<EntityModel<T>>
    where
        T: Serialize,
        F: Fn(&T) -> Option<i32>,
    {
        let size = page.size.max(1);
        let total_pages = page.total_pages();
        let number = page.number;

        let mut links = Links::new()
            .with("self", self.events_page(number, size))
            .with("profile", self.profile("list"));
        if total_pages > 0 {
            links.add("first", self.events_page(0, size));
            links.add("last", self.events_page(total_pages - 1, size));
        }
        if number > 0 {
            links.add("prev", self.events_page(number - 1, size));
        }
        if let Some(next) = number.checked_add(1).filter(|n| *n < total_pages) {
            links.add("next", self.events_page(next, size));
        }

        let total_elements = page.total_elements;
        let items: Vec<EntityModel<T>> = page
            .content
            .into_iter()
            .map(|item| {
                let links = id_of(&item)
                    .map(|id| self.event_links(id))
                    .unwrap_or_default();
                EntityModel::new(item, links)
            })
            .collect();

        PagedModel {
            embedded: (!items.is_empty()).then(|| Embedded { event_list: items }),
            links,
            page: PageMetadata {
                size,
                total_elements,
                total_pages,
                number,
            },
        }
    }
}
