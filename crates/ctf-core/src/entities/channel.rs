//! Platform channel types

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Channel kinds the bot distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Category,
    Voice,
    /// Any other platform channel type
    Other,
}

/// Principal targeted by a permission overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteKind {
    Role,
    Member,
}

/// Allow/deny pair for one principal on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    pub kind: OverwriteKind,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl PermissionOverwrite {
    /// Overwrite targeting a role
    pub fn role(id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id,
            kind: OverwriteKind::Role,
            allow,
            deny,
        }
    }
}

/// Snapshot of a guild channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub kind: ChannelKind,
    pub parent_id: Option<Snowflake>,
    pub topic: Option<String>,
    #[serde(default)]
    pub overwrites: Vec<PermissionOverwrite>,
}

impl Channel {
    #[inline]
    pub fn is_category(&self) -> bool {
        self.kind == ChannelKind::Category
    }
}

/// Request to create a guild channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCreate {
    pub name: String,
    pub kind: ChannelKind,
    pub parent_id: Option<Snowflake>,
    pub topic: Option<String>,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl ChannelCreate {
    /// A category with the given overwrites
    pub fn category(name: impl Into<String>, overwrites: Vec<PermissionOverwrite>) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Category,
            parent_id: None,
            topic: None,
            overwrites,
        }
    }

    /// A text channel nested under `parent_id`
    pub fn text(
        name: impl Into<String>,
        parent_id: Snowflake,
        overwrites: Vec<PermissionOverwrite>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Text,
            parent_id: Some(parent_id),
            topic: None,
            overwrites,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}
