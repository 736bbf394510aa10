//! Calendar events listed by the info and vote commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An upcoming competition as reported by the external calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Organizing team names
    pub organizers: Vec<String>,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    /// Rating weight
    pub weight: f64,
    pub participants: i64,
    pub format: String,
    pub onsite: bool,
    pub location: String,
    pub logo: String,
    /// Event homepage
    pub url: String,
    /// Canonical calendar page
    pub ctftime_url: String,
}

/// Query window for [`crate::traits::EventCalendar::find_events`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
    /// Zero lets the calendar pick its default
    pub limit: u32,
}
