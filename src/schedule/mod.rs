//! Expands a scheduling request into an ordered sequence of calendar
//! event drafts ready to be persisted by a calendar client.

pub mod expand;
pub mod models;

pub use expand::{expand, expand_now};
pub use models::{EventDraft, EventPattern, ScheduleRequest, Segment, ValidationError};
