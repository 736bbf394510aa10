//! Snapshot cache of guild channels and roles
//!
//! Uses `DashMap` for concurrent access. Lookups never await; the client keeps
//! entries current after each mutation and a background task replaces the
//! whole snapshot periodically.
//!
//! Every local mutation is stamped with a generation. A refresh records the
//! generation before it fetches and leaves alone any entry mutated after that,
//! since the fetched copy may predate it.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use ctf_core::{Channel, Role, Snowflake};

/// Locally cached copy of the guild's channels and roles
#[derive(Debug, Default)]
pub struct SnapshotCache {
    channels: DashMap<Snowflake, Channel>,
    roles: DashMap<Snowflake, Role>,
    generation: AtomicU64,
    /// Generation of the latest local mutation per id
    touched: DashMap<Snowflake, u64>,
}

impl SnapshotCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, id: Snowflake) -> Option<Channel> {
        self.channels.get(&id).map(|c| c.clone())
    }

    pub fn role(&self, id: Snowflake) -> Option<Role> {
        self.roles.get(&id).map(|r| r.clone())
    }

    /// Channels whose parent is `parent_id`
    pub fn children(&self, parent_id: Snowflake) -> Vec<Channel> {
        self.channels
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .map(|c| c.value().clone())
            .collect()
    }

    pub fn upsert_channel(&self, channel: Channel) {
        self.touch(channel.id);
        self.channels.insert(channel.id, channel);
    }

    pub fn upsert_role(&self, role: Role) {
        self.touch(role.id);
        self.roles.insert(role.id, role);
    }

    pub fn remove_channel(&self, id: Snowflake) {
        self.touch(id);
        self.channels.remove(&id);
    }

    pub fn remove_role(&self, id: Snowflake) {
        self.touch(id);
        self.roles.remove(&id);
    }

    /// Current generation; take it before fetching a snapshot
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn touch(&self, id: Snowflake) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.touched.insert(id, generation);
    }

    fn mutated_since(&self, id: Snowflake, since: u64) -> bool {
        self.touched.get(&id).is_some_and(|g| *g > since)
    }

    /// Replace the snapshot with one fetched after generation `since`
    ///
    /// Entries missing from the fetch are dropped and the rest overwritten in
    /// place, so concurrent readers never observe an empty cache. Entries
    /// mutated locally after `since` keep their local state.
    pub fn replace(&self, since: u64, channels: Vec<Channel>, roles: Vec<Role>) {
        self.channels.retain(|id, _| {
            channels.iter().any(|c| c.id == *id) || self.mutated_since(*id, since)
        });
        for channel in channels {
            if !self.mutated_since(channel.id, since) {
                self.channels.insert(channel.id, channel);
            }
        }

        self.roles.retain(|id, _| {
            roles.iter().any(|r| r.id == *id) || self.mutated_since(*id, since)
        });
        for role in roles {
            if !self.mutated_since(role.id, since) {
                self.roles.insert(role.id, role);
            }
        }

        self.touched.retain(|_, g| *g > since);
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}
