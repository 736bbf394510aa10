//! Delivery of deferred replies

use async_trait::async_trait;

use ctf_core::RepoResult;
use ctf_discord::{DiscordClient, MessagePayload};

/// Edits the placeholder left by a deferred acknowledgement
#[async_trait]
pub trait FollowUp: Send + Sync {
    async fn edit_original(&self, interaction_token: &str, message: &MessagePayload)
        -> RepoResult<()>;
}

#[async_trait]
impl FollowUp for DiscordClient {
    async fn edit_original(
        &self,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> RepoResult<()> {
        self.edit_original_response(interaction_token, message).await
    }
}
