//! Chat platform port
//!
//! Mutations go to the platform; lookups are served from a locally cached
//! snapshot and never block.

use async_trait::async_trait;

use crate::entities::{Channel, ChannelCreate, MessageCreate, Role, RoleCreate};
use crate::value_objects::Snowflake;

use super::RepoResult;

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Guild the bot operates in; also the id of its default ("everyone") role
    fn guild_id(&self) -> Snowflake;

    async fn create_role(&self, role: &RoleCreate) -> RepoResult<Role>;

    async fn delete_role(&self, role_id: Snowflake) -> RepoResult<()>;

    async fn create_channel(&self, channel: &ChannelCreate) -> RepoResult<Channel>;

    async fn delete_channel(&self, channel_id: Snowflake) -> RepoResult<()>;

    async fn rename_channel(&self, channel_id: Snowflake, name: &str) -> RepoResult<Channel>;

    /// Replace a member's role set
    async fn set_member_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()>;

    /// Post a message, returning its id
    async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &MessageCreate,
    ) -> RepoResult<Snowflake>;

    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<()>;

    /// Cached channel by id
    fn channel(&self, channel_id: Snowflake) -> Option<Channel>;

    /// Cached role by id
    fn role(&self, role_id: Snowflake) -> Option<Role>;

    /// Cached channels whose parent is `parent_id`
    fn channels_in(&self, parent_id: Snowflake) -> Vec<Channel>;
}
