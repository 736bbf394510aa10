//! Message wire models: embeds and button components
//!
//! The same payload shape is used for `POST /channels/{id}/messages` and for
//! the `data` of an interaction response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ctf_core::{Button, ButtonStyle, Embed, MessageCreate, Snowflake};

/// Message flag hiding a reply from everyone but the invoker
pub const EPHEMERAL: u32 = 1 << 6;

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const BUTTONS_PER_ROW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFieldModel {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedFieldModel>,
}

impl From<&Embed> for EmbedModel {
    fn from(embed: &Embed) -> Self {
        Self {
            title: embed.title.clone(),
            description: embed.description.clone(),
            url: embed.url.clone(),
            color: embed.color,
            timestamp: embed.timestamp,
            // The API rejects empty thumbnail urls
            thumbnail: embed
                .thumbnail
                .as_ref()
                .filter(|url| !url.is_empty())
                .map(|url| EmbedThumbnail { url: url.clone() }),
            footer: embed.footer.as_ref().map(|text| EmbedFooter { text: text.clone() }),
            fields: embed
                .fields
                .iter()
                .map(|f| EmbedFieldModel {
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonModel {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
}

impl From<&Button> for ButtonModel {
    fn from(button: &Button) -> Self {
        Self {
            kind: BUTTON,
            style: match button.style {
                ButtonStyle::Primary => 1,
                ButtonStyle::Secondary => 2,
                ButtonStyle::Success => 3,
                ButtonStyle::Danger => 4,
            },
            label: button.label.clone(),
            custom_id: button.custom_id.clone(),
        }
    }
}

/// Top-level component holding up to five buttons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<ButtonModel>,
}

/// Message content, embeds and components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<EmbedModel>,
    pub components: Vec<ActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

impl MessagePayload {
    /// Mark the payload visible to the invoker only
    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | EPHEMERAL);
        self
    }
}

impl From<&MessageCreate> for MessagePayload {
    fn from(message: &MessageCreate) -> Self {
        Self {
            content: message.content.clone(),
            embeds: message.embeds.iter().map(EmbedModel::from).collect(),
            components: message
                .buttons
                .chunks(BUTTONS_PER_ROW)
                .map(|row| ActionRow {
                    kind: ACTION_ROW,
                    components: row.iter().map(ButtonModel::from).collect(),
                })
                .collect(),
            flags: None,
        }
    }
}

/// Minimal message object returned after posting
#[derive(Debug, Clone, Deserialize)]
pub struct MessageModel {
    pub id: Snowflake,
}
