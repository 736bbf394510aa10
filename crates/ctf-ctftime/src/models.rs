//! Wire models of the CTFtime events API

use chrono::{DateTime, Utc};
use serde::Deserialize;

use ctf_core::CalendarEvent;

/// Organizing team as listed on an event
#[derive(Debug, Clone, Deserialize)]
pub struct TeamModel {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

/// Event as returned by `/events/` and `/events/{id}/`
///
/// Fields the bot never reads (duration, restrictions, voting flags) are not
/// modelled; serde skips them.
#[derive(Debug, Clone, Deserialize)]
pub struct EventModel {
    pub id: i64,
    #[serde(default)]
    pub ctf_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organizers: Vec<TeamModel>,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub participants: i64,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub onsite: bool,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub ctftime_url: String,
}

impl From<EventModel> for CalendarEvent {
    fn from(model: EventModel) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            organizers: model.organizers.into_iter().map(|t| t.name).collect(),
            start: model.start,
            finish: model.finish,
            weight: model.weight,
            participants: model.participants,
            format: model.format,
            onsite: model.onsite,
            location: model.location,
            logo: model.logo,
            url: model.url,
            ctftime_url: model.ctftime_url,
        }
    }
}
