//! Interaction wire types
//!
//! Only the fields the bot reads are modelled; everything else in the
//! platform's payload is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ctf_common::AppError;
use ctf_core::{Permissions, Snowflake};
use ctf_discord::MessagePayload;
use ctf_service::{Invocation, Reply, ReplyMode};

// Inbound interaction types
pub const PING: u8 = 1;
pub const APPLICATION_COMMAND: u8 = 2;
pub const MESSAGE_COMPONENT: u8 = 3;

// Outbound response types
const PONG: u8 = 1;
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
const DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE: u8 = 5;
const DEFERRED_UPDATE_MESSAGE: u8 = 6;
const UPDATE_MESSAGE: u8 = 7;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
}

/// Guild member that triggered the interaction
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    /// Permissions in the invoking channel
    #[serde(default)]
    pub permissions: Permissions,
}

/// One `name`/`value` pair of a slash command
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOptionValue {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOptionValue>,
    /// Component custom id
    pub custom_id: Option<String>,
}

impl InteractionData {
    fn option(&self, name: &str) -> Option<&Value> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    pub fn string_option(&self, name: &str) -> Option<String> {
        self.option(name).and_then(Value::as_str).map(ToString::to_string)
    }

    /// Integer option; platforms may send integers as strings
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }
}

/// Inbound interaction
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    pub guild_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    pub member: Option<Member>,
    /// Absent on pings
    #[serde(default)]
    pub data: InteractionData,
    /// Authorizes follow-up edits of the response
    #[serde(default)]
    pub token: String,
}

impl Interaction {
    /// Caller description for the workflows
    ///
    /// Interactions from direct messages or another guild are refused.
    pub fn invocation(&self, guild_id: Snowflake) -> Result<Invocation, AppError> {
        if self.guild_id != Some(guild_id) {
            return Err(AppError::invalid_payload("interaction is not from the bot's guild"));
        }
        let member = self
            .member
            .as_ref()
            .ok_or_else(|| AppError::invalid_payload("missing member"))?;
        let channel_id = self
            .channel_id
            .ok_or_else(|| AppError::invalid_payload("missing channel_id"))?;

        Ok(Invocation {
            user_id: member.user.id,
            user_name: member.user.username.clone(),
            channel_id,
            permissions: member.permissions,
            role_ids: member.roles.clone(),
        })
    }
}

/// Synchronous response to an interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }

    /// Private placeholder, replaced by a follow-up edit
    pub fn deferred_message() -> Self {
        Self {
            kind: DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(MessagePayload::default().ephemeral()),
        }
    }

    /// Leave the component's message in place until a follow-up edit
    pub fn deferred_update() -> Self {
        Self {
            kind: DEFERRED_UPDATE_MESSAGE,
            data: None,
        }
    }
}

impl From<&Reply> for InteractionResponse {
    fn from(reply: &Reply) -> Self {
        let payload = MessagePayload::from(&reply.message);
        let (kind, payload) = match reply.mode {
            ReplyMode::Ephemeral => (CHANNEL_MESSAGE_WITH_SOURCE, payload.ephemeral()),
            ReplyMode::Public => (CHANNEL_MESSAGE_WITH_SOURCE, payload),
            ReplyMode::Update => (UPDATE_MESSAGE, payload),
        };
        Self {
            kind,
            data: Some(payload),
        }
    }
}
