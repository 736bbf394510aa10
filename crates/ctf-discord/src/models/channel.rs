//! Channel and role wire models

use serde::{Deserialize, Serialize};

use ctf_core::{
    Channel, ChannelCreate, ChannelKind, OverwriteKind, PermissionOverwrite, Permissions, Role,
    RoleCreate, Snowflake,
};

const GUILD_TEXT: u8 = 0;
const GUILD_VOICE: u8 = 2;
const GUILD_CATEGORY: u8 = 4;

const OVERWRITE_ROLE: u8 = 0;
const OVERWRITE_MEMBER: u8 = 1;

fn kind_from_wire(kind: u8) -> ChannelKind {
    match kind {
        GUILD_TEXT => ChannelKind::Text,
        GUILD_VOICE => ChannelKind::Voice,
        GUILD_CATEGORY => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

/// Wire channel type for a kind the bot can create
pub fn kind_to_wire(kind: ChannelKind) -> Option<u8> {
    match kind {
        ChannelKind::Text => Some(GUILD_TEXT),
        ChannelKind::Voice => Some(GUILD_VOICE),
        ChannelKind::Category => Some(GUILD_CATEGORY),
        ChannelKind::Other => None,
    }
}

/// Permission overwrite as sent and received by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverwriteModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl From<&PermissionOverwrite> for OverwriteModel {
    fn from(ow: &PermissionOverwrite) -> Self {
        Self {
            id: ow.id,
            kind: match ow.kind {
                OverwriteKind::Role => OVERWRITE_ROLE,
                OverwriteKind::Member => OVERWRITE_MEMBER,
            },
            allow: ow.allow,
            deny: ow.deny,
        }
    }
}

impl From<OverwriteModel> for PermissionOverwrite {
    fn from(model: OverwriteModel) -> Self {
        Self {
            id: model.id,
            kind: if model.kind == OVERWRITE_MEMBER {
                OverwriteKind::Member
            } else {
                OverwriteKind::Role
            },
            allow: model.allow,
            deny: model.deny,
        }
    }
}

/// Guild channel object
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub permission_overwrites: Vec<OverwriteModel>,
}

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Self {
            id: model.id,
            name: model.name.unwrap_or_default(),
            kind: kind_from_wire(model.kind),
            parent_id: model.parent_id,
            topic: model.topic,
            overwrites: model
                .permission_overwrites
                .into_iter()
                .map(PermissionOverwrite::from)
                .collect(),
        }
    }
}

/// Body of `POST /guilds/{guild}/channels`
#[derive(Debug, Clone, Serialize)]
pub struct CreateChannelBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a str>,
    pub permission_overwrites: Vec<OverwriteModel>,
}

impl<'a> CreateChannelBody<'a> {
    pub fn new(channel: &'a ChannelCreate, kind: u8) -> Self {
        Self {
            name: &channel.name,
            kind,
            parent_id: channel.parent_id,
            topic: channel.topic.as_deref(),
            permission_overwrites: channel.overwrites.iter().map(OverwriteModel::from).collect(),
        }
    }
}

/// Body of `PATCH /channels/{channel}` when renaming
#[derive(Debug, Clone, Serialize)]
pub struct RenameChannelBody<'a> {
    pub name: &'a str,
}

/// Guild role object
#[derive(Debug, Clone, Deserialize)]
pub struct RoleModel {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub mentionable: bool,
    #[serde(default)]
    pub permissions: Permissions,
}

impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            mentionable: model.mentionable,
            permissions: model.permissions,
        }
    }
}

/// Body of `POST /guilds/{guild}/roles`
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoleBody<'a> {
    pub name: &'a str,
    pub mentionable: bool,
}

impl<'a> From<&'a RoleCreate> for CreateRoleBody<'a> {
    fn from(role: &'a RoleCreate) -> Self {
        Self {
            name: &role.name,
            mentionable: role.mentionable,
        }
    }
}

/// Body of `PATCH /guilds/{guild}/members/{user}` when replacing roles
#[derive(Debug, Clone, Serialize)]
pub struct MemberRolesBody<'a> {
    pub roles: &'a [Snowflake],
}
