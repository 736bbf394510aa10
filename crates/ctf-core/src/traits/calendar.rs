//! External event calendar port

use async_trait::async_trait;

use crate::entities::{CalendarEvent, EventFilter};

use super::RepoResult;

#[async_trait]
pub trait EventCalendar: Send + Sync {
    /// Events inside the filter's window
    async fn find_events(&self, filter: &EventFilter) -> RepoResult<Vec<CalendarEvent>>;

    /// A single event, `EventNotFound` if the calendar does not know it
    async fn find_event(&self, id: i64) -> RepoResult<CalendarEvent>;
}
