//! Transport-neutral replies
//!
//! A workflow returns one `Reply`; the transport renders it once.

use ctf_core::{Embed, MessageCreate};

/// How the reply is delivered to the invoker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// New message visible to the invoker only
    Ephemeral,
    /// New message visible to the whole channel
    Public,
    /// Replace the message carrying the pressed button
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub mode: ReplyMode,
    pub message: MessageCreate,
}

impl Reply {
    pub fn ephemeral(message: MessageCreate) -> Self {
        Self {
            mode: ReplyMode::Ephemeral,
            message,
        }
    }

    pub fn public(message: MessageCreate) -> Self {
        Self {
            mode: ReplyMode::Public,
            message,
        }
    }

    pub fn update(message: MessageCreate) -> Self {
        Self {
            mode: ReplyMode::Update,
            message,
        }
    }

    /// Ephemeral plain text
    pub fn text(content: impl Into<String>) -> Self {
        Self::ephemeral(MessageCreate::content(content))
    }

    /// Green embed carrying `description`
    pub fn success_embed(description: impl Into<String>) -> Embed {
        Embed::new().color(Embed::GREEN).description(description)
    }

    /// Neutral embed carrying `description`
    pub fn notice_embed(description: impl Into<String>) -> Embed {
        Embed::new().color(Embed::BLURPLE).description(description)
    }

    /// Ephemeral success embed
    pub fn success(description: impl Into<String>) -> Self {
        Self::ephemeral(MessageCreate::embeds(vec![Self::success_embed(description)]))
    }

    pub fn is_ephemeral(&self) -> bool {
        self.mode == ReplyMode::Ephemeral
    }
}
