//! # ctf-core
//!
//! Domain layer for the CTF bot: the persisted `Ctf` entity, the chat-platform
//! value types the orchestrator works with, and the ports (repository, platform,
//! calendar) that infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Button, ButtonStyle, CalendarEvent, Channel, ChannelCreate, ChannelKind, Ctf, CtfFilter,
    CtfUpdate, Embed, EmbedField, EventFilter, MessageCreate, OverwriteKind, PermissionOverwrite,
    Role, RoleCreate,
};
pub use error::{DomainError, ErrorKind};
pub use traits::{
    ChatPlatform, Clock, CtfRepository, EntropySource, EventCalendar, RepoResult, SystemClock,
    ThreadEntropy,
};
pub use value_objects::{
    cheer, logical_channel_name, vote_emoji, Marker, Permissions, Snowflake, SnowflakeParseError,
    CHEERS, MAX_VOTE_OPTIONS,
};
