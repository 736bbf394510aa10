//! Test harness wiring the fakes into a service context

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use ctf_bot::interactions::{execute, Route};
use ctf_core::{CalendarEvent, Channel, Permissions, Snowflake};
use ctf_service::{
    BotSettings, CreateCtfRequest, Invocation, Reply, ServiceContext, ServiceContextBuilder,
    ServiceResult,
};

use crate::fakes::{FakeCalendar, FakePlatform, FixedClock, FixedEntropy, InMemoryCtfRepository};

pub const GUILD_ID: Snowflake = Snowflake::new(100);
pub const ADMIN_ID: Snowflake = Snowflake::new(200);
pub const PLAYER_ID: Snowflake = Snowflake::new(300);

/// Instant every fixed clock reports
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A CTFtime-like event starting `days` after [`fixed_now`]
pub fn sample_event(id: i64, title: &str, days: i64) -> CalendarEvent {
    let start = fixed_now() + chrono::Duration::days(days);
    CalendarEvent {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        organizers: vec!["havce".to_string()],
        start,
        finish: start + chrono::Duration::hours(48),
        weight: 25.0,
        participants: 42,
        format: "Jeopardy".to_string(),
        onsite: false,
        location: String::new(),
        logo: String::new(),
        url: format!("https://{id}.example.org"),
        ctftime_url: format!("https://ctftime.org/event/{id}/"),
    }
}

/// Bot core with in-memory collaborators
pub struct TestBot {
    pub repo: Arc<InMemoryCtfRepository>,
    pub platform: Arc<FakePlatform>,
    pub calendar: Arc<FakeCalendar>,
    pub ctx: Arc<ServiceContext>,
    /// Channel outside any CTF
    pub lobby: Channel,
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_settings(BotSettings::default())
    }

    pub fn with_settings(settings: BotSettings) -> Self {
        let repo = Arc::new(InMemoryCtfRepository::new());
        let platform = Arc::new(FakePlatform::new(GUILD_ID));
        let calendar = Arc::new(FakeCalendar::new());

        let ctx = ServiceContextBuilder::new()
            .ctf_repo(repo.clone())
            .platform(platform.clone())
            .calendar(calendar.clone())
            .clock(Arc::new(FixedClock(fixed_now())))
            .entropy(Arc::new(FixedEntropy(0)))
            .settings(settings)
            .build()
            .map(Arc::new)
            .expect("complete service context");

        let lobby = platform.seed_channel("lobby", None);

        Self {
            repo,
            platform,
            calendar,
            ctx,
            lobby,
        }
    }

    /// Administrator invoking from `channel_id`
    pub fn admin(&self, channel_id: Snowflake) -> Invocation {
        Invocation {
            user_id: ADMIN_ID,
            user_name: "admin".to_string(),
            channel_id,
            permissions: Permissions::ADMINISTRATOR,
            role_ids: Vec::new(),
        }
    }

    /// Regular member holding `role_ids`
    pub fn member(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> Invocation {
        Invocation {
            user_id,
            user_name: format!("player-{user_id}"),
            channel_id,
            permissions: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            role_ids: role_ids.to_vec(),
        }
    }

    /// Route one interaction with a fresh token
    pub async fn run(&self, invocation: &Invocation, route: Route) -> ServiceResult<Reply> {
        execute(&self.ctx, invocation, &route, &CancellationToken::new()).await
    }

    /// Create a CTF as an administrator from the lobby
    pub async fn create_ctf(&self, name: &str) -> ServiceResult<Reply> {
        let admin = self.admin(self.lobby.id);
        self.run(&admin, Route::Create(CreateCtfRequest::new(name, None)))
            .await
    }

    /// Category, registration and general channels of a created CTF
    pub fn ctf_channels(&self, name: &str) -> (Channel, Channel, Channel) {
        let category = self
            .platform
            .channel_named(name, None)
            .expect("category exists");
        let settings = self.ctx.settings();
        let registration = self
            .platform
            .channel_named(&settings.registration_channel, Some(category.id))
            .expect("registration channel exists");
        let general = self
            .platform
            .channel_named(&settings.general_channel, Some(category.id))
            .expect("general channel exists");
        (category, registration, general)
    }
}

impl Default for TestBot {
    fn default() -> Self {
        Self::new()
    }
}
