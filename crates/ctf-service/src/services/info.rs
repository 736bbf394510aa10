//! Upcoming event listings
//!
//! Stateless: reads the external calendar and renders one card per event,
//! either privately (`info`) or as a public reaction vote (`vote`).

use chrono::{DateTime, Duration, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use ctf_core::{vote_emoji, CalendarEvent, Embed, EventFilter, MessageCreate, MAX_VOTE_OPTIONS};

use super::cancel::step;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::invocation::Invocation;
use crate::dto::{ListEventsRequest, Reply};

const CARD_FOOTER: &str = "Informations provided here may not be correct or up to date";

/// How listed events are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    Info,
    /// Titles carry the vote reaction of their position
    Vote,
}

/// Rendered result of one calendar query
#[derive(Debug, Clone)]
pub struct UpcomingEvents {
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub cards: Vec<Embed>,
}

impl UpcomingEvents {
    /// Ephemeral line sent to the caller in both modes
    pub fn summary(&self) -> String {
        format!(
            "Listed {} upcoming CTFs, from now ({}) to {}.\nHappy CTFing! :smile:",
            self.cards.len(),
            discord_time(self.start),
            discord_time(self.finish)
        )
    }
}

/// Platform timestamp markup, rendered in the reader's timezone
fn discord_time(at: DateTime<Utc>) -> String {
    format!("<t:{}:F>", at.timestamp())
}

/// Summary card of one event; `position` is 1-based and only set in vote mode
pub fn event_card(event: &CalendarEvent, now: DateTime<Utc>, position: Option<usize>) -> Embed {
    let title = match position.and_then(vote_emoji) {
        Some(emoji) => format!("{emoji} {}", event.title),
        None => event.title.clone(),
    };

    Embed::new()
        .title(title)
        .description(event.description.as_str())
        .url(event.url.as_str())
        .color(Embed::NOT_QUITE_BLACK)
        .thumbnail(event.logo.as_str())
        .footer(CARD_FOOTER)
        .timestamp(now)
        .field("Organizers", event.organizers.join(" "), false)
        .field("Starts", discord_time(event.start), false)
        .field("Ends", discord_time(event.finish), false)
        .field("Rating", event.weight.to_string(), false)
        .field("Enrolled participants", event.participants.to_string(), false)
        .field("CTFTime", event.ctftime_url.as_str(), false)
        .field("CTF link", event.url.as_str(), false)
}

/// Info service
pub struct InfoService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InfoService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Events starting from now through `weeks` weeks out, at most `limit`
    /// (zero lets the calendar decide)
    #[instrument(skip(self, token))]
    pub async fn list_upcoming(
        &self,
        weeks: u32,
        limit: u32,
        mode: ListingMode,
        token: &CancellationToken,
    ) -> ServiceResult<UpcomingEvents> {
        let start = self.ctx.clock().now();
        let finish = start + Duration::weeks(i64::from(weeks));

        let filter = EventFilter {
            start: Some(start),
            finish: Some(finish),
            limit,
        };
        let mut events = step(token, self.ctx.calendar().find_events(&filter)).await?;
        if limit > 0 {
            events.truncate(limit as usize);
        }

        let cards = events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let position = (mode == ListingMode::Vote).then_some(i + 1);
                event_card(event, start, position)
            })
            .collect();

        Ok(UpcomingEvents {
            start,
            finish,
            cards,
        })
    }

    /// `info`: cards shown to the caller only
    pub async fn info(
        &self,
        request: &ListEventsRequest,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        request.validate()?;

        let upcoming = self
            .list_upcoming(request.weeks, MAX_VOTE_OPTIONS as u32, ListingMode::Info, token)
            .await?;

        let mut message = MessageCreate::embeds(upcoming.cards.clone());
        message.content = Some(upcoming.summary());
        Ok(Reply::ephemeral(message))
    }

    /// `vote`: cards posted publicly with one reaction per event
    #[instrument(skip(self, invocation, token), fields(channel_id = %invocation.channel_id))]
    pub async fn vote(
        &self,
        invocation: &Invocation,
        request: &ListEventsRequest,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        request.validate()?;

        let upcoming = self
            .list_upcoming(request.weeks, MAX_VOTE_OPTIONS as u32, ListingMode::Vote, token)
            .await?;

        if !upcoming.cards.is_empty() {
            let platform = self.ctx.platform();
            let message = MessageCreate::embeds(upcoming.cards.clone());
            let message_id =
                step(token, platform.create_message(invocation.channel_id, &message)).await?;

            for emoji in (1..=upcoming.cards.len()).filter_map(vote_emoji) {
                step(
                    token,
                    platform.add_reaction(invocation.channel_id, message_id, emoji),
                )
                .await?;
            }

            info!(%message_id, options = upcoming.cards.len(), "Vote started");
        }

        Ok(Reply::text(upcoming.summary()))
    }
}
