pub mod calendar;
pub use calendar::UpcomingEventsTool;

pub mod schedule;
pub use schedule::CreateCalendarEventTool;
