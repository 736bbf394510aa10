//! Provisioning journal
//!
//! Records every platform resource a multi-step workflow created so that a
//! failure part way through can be reported or compensated.

use tracing::{error, warn};

use ctf_common::CompensationPolicy;
use ctf_core::{ChatPlatform, Snowflake};

/// A resource created by a successful provisioning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionedResource {
    Role(Snowflake),
    Channel { id: Snowflake, name: String },
}

impl ProvisionedResource {
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Role(id) | Self::Channel { id, .. } => *id,
        }
    }
}

/// Completed steps, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionJournal {
    entries: Vec<ProvisionedResource>,
}

impl ProvisionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, resource: ProvisionedResource) {
        self.entries.push(resource);
    }

    /// Resources still present on the platform as far as the journal knows
    pub fn leftovers(&self) -> &[ProvisionedResource] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply `policy` to the recorded resources
    ///
    /// Never fails: under `Manual` each leftover is logged for an operator,
    /// under `BestEffort` channels are deleted newest first, then roles, and
    /// each failed deletion is logged and skipped.
    pub async fn compensate(&self, platform: &dyn ChatPlatform, policy: CompensationPolicy) {
        match policy {
            CompensationPolicy::Manual => {
                for resource in &self.entries {
                    match resource {
                        ProvisionedResource::Role(id) => {
                            warn!(role_id = %id, "Provisioning aborted, role left in place");
                        }
                        ProvisionedResource::Channel { id, name } => {
                            warn!(
                                channel_id = %id,
                                channel = %name,
                                "Provisioning aborted, channel left in place"
                            );
                        }
                    }
                }
            }
            CompensationPolicy::BestEffort => {
                let channels = self
                    .entries
                    .iter()
                    .rev()
                    .filter(|r| matches!(r, ProvisionedResource::Channel { .. }));
                let roles = self
                    .entries
                    .iter()
                    .rev()
                    .filter(|r| matches!(r, ProvisionedResource::Role(_)));

                for resource in channels.chain(roles) {
                    let result = match resource {
                        ProvisionedResource::Channel { id, .. } => {
                            platform.delete_channel(*id).await
                        }
                        ProvisionedResource::Role(id) => platform.delete_role(*id).await,
                    };
                    if let Err(e) = result {
                        error!(
                            resource_id = %resource.id(),
                            error = %e,
                            "Failed to compensate provisioned resource"
                        );
                    }
                }
            }
        }
    }
}
