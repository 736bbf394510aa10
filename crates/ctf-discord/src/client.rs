//! Discord REST client implementing the chat platform port

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use ctf_common::DiscordConfig;
use ctf_core::{
    Channel, ChannelCreate, ChatPlatform, DomainError, MessageCreate, RepoResult, Role,
    RoleCreate, Snowflake,
};

use crate::cache::SnapshotCache;
use crate::models::{
    kind_to_wire, ApplicationCommand, ChannelModel, CreateChannelBody, CreateRoleBody,
    MemberRolesBody, MessageModel, MessagePayload, RenameChannelBody, RoleModel,
};

/// Discord REST adapter
///
/// Every request carries the bot token. Successful mutations are mirrored into
/// the snapshot cache so subsequent lookups see them without a refresh.
pub struct DiscordClient {
    http: Client,
    base_url: String,
    guild_id: Snowflake,
    application_id: Snowflake,
    cache: SnapshotCache,
}

impl fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordClient")
            .field("base_url", &self.base_url)
            .field("guild_id", &self.guild_id)
            .field("channels", &self.cache.channel_count())
            .field("roles", &self.cache.role_count())
            .finish()
    }
}

fn platform_error(e: impl fmt::Display) -> DomainError {
    DomainError::PlatformError(e.to_string())
}

impl DiscordClient {
    /// Build a client authenticated with the configured bot token
    pub fn new(config: &DiscordConfig) -> RepoResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.bot_token))
            .map_err(|_| DomainError::PlatformError("bot token is not a valid header".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(platform_error)?;

        Ok(Self::with_client(
            http,
            &config.api_base_url,
            config.guild_id,
            config.application_id,
        ))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(
        http: Client,
        base_url: &str,
        guild_id: Snowflake,
        application_id: Snowflake,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            guild_id,
            application_id,
            cache: SnapshotCache::new(),
        }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request, mapping 404 to `not_found` and other failures to a platform error
    async fn send(
        &self,
        request: RequestBuilder,
        not_found: impl FnOnce() -> DomainError,
    ) -> RepoResult<Response> {
        let response = request.send().await.map_err(platform_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DomainError::PlatformError(format!("{status}: {body}")))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        not_found: impl FnOnce() -> DomainError,
    ) -> RepoResult<T> {
        self.send(request, not_found)
            .await?
            .json()
            .await
            .map_err(platform_error)
    }

    /// Fetch every channel and role of the guild and replace the snapshot
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RepoResult<()> {
        let guild_missing = || DomainError::PlatformError(format!("guild {} not found", self.guild_id));
        let since = self.cache.generation();

        let channels: Vec<ChannelModel> = self
            .send_json(
                self.http.get(self.url(&format!("/guilds/{}/channels", self.guild_id))),
                guild_missing,
            )
            .await?;
        let roles: Vec<RoleModel> = self
            .send_json(
                self.http.get(self.url(&format!("/guilds/{}/roles", self.guild_id))),
                guild_missing,
            )
            .await?;

        self.cache.replace(
            since,
            channels.into_iter().map(Channel::from).collect(),
            roles.into_iter().map(Role::from).collect(),
        );
        debug!(
            channels = self.cache.channel_count(),
            roles = self.cache.role_count(),
            "Snapshot refreshed"
        );
        Ok(())
    }

    /// Refresh the snapshot every `every` until `shutdown` is cancelled
    pub async fn run_refresh(self: Arc<Self>, every: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the caller has just refreshed
        ticker.tick().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "Snapshot refresh failed");
                    }
                }
            }
        }

        debug!("Snapshot refresh task stopped");
    }

    /// Overwrite the guild's command definitions
    #[instrument(skip(self, commands), fields(count = commands.len()))]
    pub async fn register_commands(&self, commands: &[ApplicationCommand]) -> RepoResult<()> {
        let path = format!(
            "/applications/{}/guilds/{}/commands",
            self.application_id, self.guild_id
        );
        self.send(self.http.put(self.url(&path)).json(commands), || {
            DomainError::PlatformError("application or guild not found".into())
        })
        .await?;

        info!("Guild commands registered");
        Ok(())
    }

    /// Replace the deferred response of an interaction
    ///
    /// `PATCH /webhooks/{app}/{token}/messages/@original`; the token stays
    /// valid for fifteen minutes after the interaction was received.
    #[instrument(skip_all)]
    pub async fn edit_original_response(
        &self,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> RepoResult<()> {
        let application_id = self.application_id.to_string();
        let url = self.segments_url(&[
            "webhooks",
            application_id.as_str(),
            interaction_token,
            "messages",
            "@original",
        ])?;

        self.send(self.http.patch(url).json(message), || {
            DomainError::PlatformError("interaction expired or unknown".into())
        })
        .await?;
        Ok(())
    }

    fn reaction_url(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Url> {
        let channel_id = channel_id.to_string();
        let message_id = message_id.to_string();

        self.segments_url(&[
            "channels",
            channel_id.as_str(),
            "messages",
            message_id.as_str(),
            "reactions",
            emoji,
            "@me",
        ])
    }

    /// Base url extended with percent-encoded path segments
    fn segments_url(&self, segments: &[&str]) -> RepoResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(platform_error)?;
        url.path_segments_mut()
            .map_err(|()| DomainError::PlatformError("base url cannot hold a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ChatPlatform for DiscordClient {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    #[instrument(skip(self))]
    async fn create_role(&self, role: &RoleCreate) -> RepoResult<Role> {
        let path = format!("/guilds/{}/roles", self.guild_id);
        let model: RoleModel = self
            .send_json(
                self.http.post(self.url(&path)).json(&CreateRoleBody::from(role)),
                || DomainError::PlatformError(format!("guild {} not found", self.guild_id)),
            )
            .await?;

        let role = Role::from(model);
        self.cache.upsert_role(role.clone());
        Ok(role)
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, role_id: Snowflake) -> RepoResult<()> {
        let path = format!("/guilds/{}/roles/{role_id}", self.guild_id);
        let result = self
            .send(self.http.delete(self.url(&path)), || {
                DomainError::RoleNotFound(role_id)
            })
            .await;

        // Gone either way
        if matches!(result, Ok(_) | Err(DomainError::RoleNotFound(_))) {
            self.cache.remove_role(role_id);
        }
        result.map(|_| ())
    }

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    async fn create_channel(&self, channel: &ChannelCreate) -> RepoResult<Channel> {
        let kind = kind_to_wire(channel.kind).ok_or_else(|| {
            DomainError::ValidationError(format!("cannot create a {:?} channel", channel.kind))
        })?;

        let path = format!("/guilds/{}/channels", self.guild_id);
        let parent = channel.parent_id;
        let model: ChannelModel = self
            .send_json(
                self.http
                    .post(self.url(&path))
                    .json(&CreateChannelBody::new(channel, kind)),
                || parent.map_or_else(
                    || DomainError::PlatformError(format!("guild {} not found", self.guild_id)),
                    DomainError::ChannelNotFound,
                ),
            )
            .await?;

        let channel = Channel::from(model);
        self.cache.upsert_channel(channel.clone());
        Ok(channel)
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel_id: Snowflake) -> RepoResult<()> {
        let path = format!("/channels/{channel_id}");
        let result = self
            .send(self.http.delete(self.url(&path)), || {
                DomainError::ChannelNotFound(channel_id)
            })
            .await;

        if matches!(result, Ok(_) | Err(DomainError::ChannelNotFound(_))) {
            self.cache.remove_channel(channel_id);
        }
        result.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> RepoResult<Channel> {
        let path = format!("/channels/{channel_id}");
        let model: ChannelModel = self
            .send_json(
                self.http
                    .patch(self.url(&path))
                    .json(&RenameChannelBody { name }),
                || DomainError::ChannelNotFound(channel_id),
            )
            .await?;

        let channel = Channel::from(model);
        self.cache.upsert_channel(channel.clone());
        Ok(channel)
    }

    #[instrument(skip(self))]
    async fn set_member_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()> {
        let path = format!("/guilds/{}/members/{user_id}", self.guild_id);
        self.send(
            self.http
                .patch(self.url(&path))
                .json(&MemberRolesBody { roles: role_ids }),
            || DomainError::PlatformError(format!("member {user_id} not found")),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, message))]
    async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &MessageCreate,
    ) -> RepoResult<Snowflake> {
        let path = format!("/channels/{channel_id}/messages");
        let model: MessageModel = self
            .send_json(
                self.http
                    .post(self.url(&path))
                    .json(&MessagePayload::from(message)),
                || DomainError::ChannelNotFound(channel_id),
            )
            .await?;
        Ok(model.id)
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<()> {
        let url = self.reaction_url(channel_id, message_id, emoji)?;
        self.send(self.http.put(url).header("content-length", 0), || {
            DomainError::ChannelNotFound(channel_id)
        })
        .await?;
        Ok(())
    }

    fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.cache.channel(channel_id)
    }

    fn role(&self, role_id: Snowflake) -> Option<Role> {
        self.cache.role(role_id)
    }

    fn channels_in(&self, parent_id: Snowflake) -> Vec<Channel> {
        self.cache.children(parent_id)
    }
}
