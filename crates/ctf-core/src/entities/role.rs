//! Platform role types

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Snapshot of a guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    pub mentionable: bool,
    #[serde(default)]
    pub permissions: Permissions,
}

/// Request to create a guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub mentionable: bool,
}

impl RoleCreate {
    pub fn mentionable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mentionable: true,
        }
    }
}
