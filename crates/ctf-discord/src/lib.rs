//! # ctf-discord
//!
//! Chat platform adapter over the Discord REST API.
//!
//! ## Overview
//!
//! - `DiscordClient`: implements the `ChatPlatform` port
//! - `SnapshotCache`: concurrent copy of the guild's channels and roles, kept
//!   current by mutations and a periodic background refresh
//! - Wire models for channels, roles, messages and application commands
//!
//! Inbound interactions are not handled here; see `ctf-bot`.

pub mod cache;
pub mod client;
pub mod models;

pub use cache::SnapshotCache;
pub use client::DiscordClient;
pub use models::{
    ActionRow, ApplicationCommand, ButtonModel, ChannelModel, CommandOption, CommandOptionType,
    EmbedModel, MessagePayload, OverwriteModel, RoleModel,
};
