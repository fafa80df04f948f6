pub mod event;

pub use event::{Event, EventDto, EventStatus};
