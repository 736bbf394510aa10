//! Application command definitions for bulk registration

use serde::{Serialize, Serializer};

const CHAT_INPUT: u8 = 1;

/// Option value type; only the types the bot declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOptionType {
    String,
    Integer,
}

impl CommandOptionType {
    pub const fn code(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
        }
    }
}

impl Serialize for CommandOptionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Longest accepted string value, enforced by the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

/// Slash command as accepted by `PUT /applications/{app}/guilds/{guild}/commands`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationCommand {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl ApplicationCommand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: CHAT_INPUT,
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(
        mut self,
        kind: CommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.options.push(CommandOption {
            kind,
            name: name.into(),
            description: description.into(),
            required,
            max_length: None,
        });
        self
    }

    /// Cap the length of the last added string option
    pub fn max_length(mut self, max_length: u16) -> Self {
        if let Some(option) = self.options.last_mut() {
            option.max_length = Some(max_length);
        }
        self
    }
}
