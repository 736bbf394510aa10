//! In-memory port implementations
//!
//! Each fake keeps its state behind `parking_lot` locks so scenario tests can
//! inspect it after a workflow ran.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use parking_lot::Mutex;
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

use ctf_bot::interactions::FollowUp;
use ctf_core::{
    Button, CalendarEvent, Channel, ChannelCreate, ChannelKind, ChatPlatform, Clock, Ctf,
    CtfFilter, CtfRepository, CtfUpdate, DomainError, EntropySource, EventCalendar, EventFilter,
    MessageCreate, Permissions, RepoResult, Role, RoleCreate, Snowflake,
};
use ctf_discord::MessagePayload;

fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::microseconds(1)).unwrap_or(now)
}

// ============================================================================
// Store
// ============================================================================

/// CTF store keeping rows in insertion order
#[derive(Default)]
pub struct InMemoryCtfRepository {
    rows: Mutex<Vec<Ctf>>,
    next_id: AtomicI64,
    queries: AtomicUsize,
    /// Name lookups still to be held, and where they meet
    held_lookups: Mutex<Option<(usize, Arc<Barrier>)>>,
}

impl InMemoryCtfRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations issued against the store
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Ctf> {
        self.rows.lock().clone()
    }

    /// Hold the next `count` name lookups until all of them have read
    ///
    /// Each held lookup answers from the rows as they were when it ran, so
    /// concurrent callers all see the same state before any of them writes.
    pub fn hold_lookups(&self, count: usize) {
        *self.held_lookups.lock() = Some((count, Arc::new(Barrier::new(count))));
    }

    fn touch(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    fn held_lookup(&self) -> Option<Arc<Barrier>> {
        let mut held = self.held_lookups.lock();
        let (remaining, barrier) = held.as_mut()?;
        let barrier = barrier.clone();
        *remaining -= 1;
        if *remaining == 0 {
            *held = None;
        }
        Some(barrier)
    }
}

#[async_trait]
impl CtfRepository for InMemoryCtfRepository {
    async fn find_by_name(&self, name: &str) -> RepoResult<Ctf> {
        self.touch();
        let found = self
            .rows
            .lock()
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| DomainError::CtfNotFound(name.to_string()));

        if let Some(barrier) = self.held_lookup() {
            barrier.wait().await;
        }
        found
    }

    async fn find(&self, filter: &CtfFilter) -> RepoResult<(Vec<Ctf>, u64)> {
        self.touch();
        let matching: Vec<Ctf> = self
            .rows
            .lock()
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(if filter.limit == 0 {
                usize::MAX
            } else {
                filter.limit as usize
            })
            .collect::<Vec<_>>();

        let total = if page.is_empty() { 0 } else { total };
        Ok((page, total))
    }

    async fn create(&self, ctf: &mut Ctf) -> RepoResult<()> {
        self.touch();
        ctf.validate()?;

        let mut rows = self.rows.lock();
        if rows.iter().any(|c| c.name == ctf.name) {
            return Err(DomainError::CtfAlreadyExists(ctf.name.clone()));
        }

        let now = now_micros();
        ctf.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        ctf.created_at = now;
        ctf.updated_at = now;
        rows.push(ctf.clone());
        Ok(())
    }

    async fn update(&self, name: &str, update: &CtfUpdate) -> RepoResult<Ctf> {
        self.touch();
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DomainError::CtfNotFound(name.to_string()))?;

        let mut updated = row.clone();
        updated.apply(update);
        updated.updated_at = now_micros().max(row.updated_at + Duration::microseconds(1));
        updated.validate()?;

        *row = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, name: &str) -> RepoResult<()> {
        self.touch();
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|c| c.name != name);
        if rows.len() == before {
            return Err(DomainError::CtfNotFound(name.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Chat platform
// ============================================================================

/// A message the fake platform accepted
#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub message: MessageCreate,
}

/// Guild held in memory
///
/// Mutating calls are numbered from 1; a test can make the Nth one fail or
/// have it cancel a token while it runs.
pub struct FakePlatform {
    guild_id: Snowflake,
    next_id: AtomicU64,
    channels: Mutex<BTreeMap<Snowflake, Channel>>,
    roles: Mutex<BTreeMap<Snowflake, Role>>,
    member_roles: Mutex<HashMap<Snowflake, Vec<Snowflake>>>,
    messages: Mutex<Vec<PostedMessage>>,
    reactions: Mutex<Vec<(Snowflake, String)>>,
    calls: AtomicUsize,
    fail_at: Mutex<Option<usize>>,
    cancel_at: Mutex<Option<(usize, CancellationToken)>>,
}

impl FakePlatform {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            next_id: AtomicU64::new(1000),
            channels: Mutex::new(BTreeMap::new()),
            roles: Mutex::new(BTreeMap::new()),
            member_roles: Mutex::new(HashMap::new()),
            messages: Mutex::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_at: Mutex::new(None),
            cancel_at: Mutex::new(None),
        }
    }

    fn next_id(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Count a mutating call, applying injected failure and cancellation
    fn begin(&self) -> RepoResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if *self.fail_at.lock() == Some(call) {
            return Err(DomainError::PlatformError("injected failure".to_string()));
        }
        if let Some((at, token)) = self.cancel_at.lock().as_ref() {
            if *at == call {
                token.cancel();
            }
        }
        Ok(())
    }

    /// Make the `call`th mutating call fail
    pub fn fail_at(&self, call: usize) {
        *self.fail_at.lock() = Some(call);
    }

    /// Cancel `token` while the `call`th mutating call runs
    pub fn cancel_at(&self, call: usize, token: CancellationToken) {
        *self.cancel_at.lock() = Some((call, token));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Add a channel without counting a call
    pub fn seed_channel(&self, name: &str, parent_id: Option<Snowflake>) -> Channel {
        let channel = Channel {
            id: self.next_id(),
            name: name.to_string(),
            kind: if parent_id.is_some() {
                ChannelKind::Text
            } else {
                ChannelKind::Category
            },
            parent_id,
            topic: None,
            overwrites: Vec::new(),
        };
        self.channels.lock().insert(channel.id, channel.clone());
        channel
    }

    /// Delete a role behind the bot's back, without counting a call
    pub fn remove_role_out_of_band(&self, role_id: Snowflake) {
        self.roles.lock().remove(&role_id);
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.channels.lock().values().cloned().collect()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.roles.lock().values().cloned().collect()
    }

    pub fn channel_named(&self, name: &str, parent_id: Option<Snowflake>) -> Option<Channel> {
        self.channels
            .lock()
            .values()
            .find(|c| c.name == name && c.parent_id == parent_id)
            .cloned()
    }

    pub fn role_named(&self, name: &str) -> Option<Role> {
        self.roles.lock().values().find(|r| r.name == name).cloned()
    }

    /// Roles last set on a member, if any
    pub fn member_roles(&self, user_id: Snowflake) -> Option<Vec<Snowflake>> {
        self.member_roles.lock().get(&user_id).cloned()
    }

    pub fn messages(&self) -> Vec<PostedMessage> {
        self.messages.lock().clone()
    }

    /// `(message id, emoji)` pairs in the order they were added
    pub fn reactions(&self) -> Vec<(Snowflake, String)> {
        self.reactions.lock().clone()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    async fn create_role(&self, role: &RoleCreate) -> RepoResult<Role> {
        self.begin()?;
        let role = Role {
            id: self.next_id(),
            name: role.name.clone(),
            mentionable: role.mentionable,
            permissions: Permissions::empty(),
        };
        self.roles.lock().insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: Snowflake) -> RepoResult<()> {
        self.begin()?;
        self.roles
            .lock()
            .remove(&role_id)
            .map(|_| ())
            .ok_or(DomainError::RoleNotFound(role_id))
    }

    async fn create_channel(&self, channel: &ChannelCreate) -> RepoResult<Channel> {
        self.begin()?;
        let channel = Channel {
            id: self.next_id(),
            name: channel.name.clone(),
            kind: channel.kind,
            parent_id: channel.parent_id,
            topic: channel.topic.clone(),
            overwrites: channel.overwrites.clone(),
        };
        self.channels.lock().insert(channel.id, channel.clone());
        Ok(channel)
    }

    async fn delete_channel(&self, channel_id: Snowflake) -> RepoResult<()> {
        self.begin()?;
        self.channels
            .lock()
            .remove(&channel_id)
            .map(|_| ())
            .ok_or(DomainError::ChannelNotFound(channel_id))
    }

    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> RepoResult<Channel> {
        self.begin()?;
        let mut channels = self.channels.lock();
        let channel = channels
            .get_mut(&channel_id)
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        channel.name = name.to_string();
        Ok(channel.clone())
    }

    async fn set_member_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()> {
        self.begin()?;
        self.member_roles.lock().insert(user_id, role_ids.to_vec());
        Ok(())
    }

    async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &MessageCreate,
    ) -> RepoResult<Snowflake> {
        self.begin()?;
        if !self.channels.lock().contains_key(&channel_id) {
            return Err(DomainError::ChannelNotFound(channel_id));
        }
        if !message.buttons.iter().all(Button::within_limits) {
            return Err(DomainError::PlatformError(
                "Invalid Form Body: button too long".to_string(),
            ));
        }
        let id = self.next_id();
        self.messages.lock().push(PostedMessage {
            id,
            channel_id,
            message: message.clone(),
        });
        Ok(id)
    }

    async fn add_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<()> {
        self.begin()?;
        self.reactions.lock().push((message_id, emoji.to_string()));
        Ok(())
    }

    fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.channels.lock().get(&channel_id).cloned()
    }

    fn role(&self, role_id: Snowflake) -> Option<Role> {
        self.roles.lock().get(&role_id).cloned()
    }

    fn channels_in(&self, parent_id: Snowflake) -> Vec<Channel> {
        self.channels
            .lock()
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect()
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Calendar answering from a fixed event list
#[derive(Default)]
pub struct FakeCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    last_filter: Mutex<Option<EventFilter>>,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: CalendarEvent) {
        self.events.lock().push(event);
    }

    pub fn last_filter(&self) -> Option<EventFilter> {
        *self.last_filter.lock()
    }
}

#[async_trait]
impl EventCalendar for FakeCalendar {
    async fn find_events(&self, filter: &EventFilter) -> RepoResult<Vec<CalendarEvent>> {
        *self.last_filter.lock() = Some(*filter);

        let mut events: Vec<CalendarEvent> = self
            .events
            .lock()
            .iter()
            .filter(|e| filter.start.is_none_or(|start| e.start >= start))
            .filter(|e| filter.finish.is_none_or(|finish| e.start <= finish))
            .cloned()
            .collect();
        if filter.limit > 0 {
            events.truncate(filter.limit as usize);
        }
        Ok(events)
    }

    async fn find_event(&self, id: i64) -> RepoResult<CalendarEvent> {
        self.events
            .lock()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(DomainError::EventNotFound(id))
    }
}

// ============================================================================
// Deferred replies
// ============================================================================

/// Records every follow-up edit instead of sending it
#[derive(Default)]
pub struct RecordingFollowUp {
    edits: Mutex<Vec<(String, MessagePayload)>>,
}

impl RecordingFollowUp {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(interaction token, payload)` pairs in delivery order
    pub fn edits(&self) -> Vec<(String, MessagePayload)> {
        self.edits.lock().clone()
    }
}

#[async_trait]
impl FollowUp for RecordingFollowUp {
    async fn edit_original(
        &self,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> RepoResult<()> {
        self.edits
            .lock()
            .push((interaction_token.to_string(), message.clone()));
        Ok(())
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u32);

impl EntropySource for FixedEntropy {
    fn next_u32(&self) -> u32 {
        self.0
    }
}
