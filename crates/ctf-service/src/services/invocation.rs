//! Who invoked what, where

use ctf_core::{Permissions, Snowflake};

/// Transport-neutral description of one inbound interaction's caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub user_id: Snowflake,
    pub user_name: String,
    /// Channel the interaction was issued from
    pub channel_id: Snowflake,
    /// Caller's resolved permissions in that channel
    pub permissions: Permissions,
    /// Roles the caller currently holds
    pub role_ids: Vec<Snowflake>,
}

impl Invocation {
    pub fn is_admin(&self) -> bool {
        self.permissions.is_administrator()
    }

    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Mention that pings the caller
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}
