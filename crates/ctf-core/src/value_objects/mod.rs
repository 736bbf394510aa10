//! Value objects - immutable types that represent domain concepts

mod flair;
mod marker;
mod permissions;
mod snowflake;

pub use flair::{cheer, vote_emoji, CHEERS, MAX_VOTE_OPTIONS};
pub use marker::{logical_channel_name, Marker};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
