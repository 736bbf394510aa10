//! Platform resource provisioning
//!
//! Turns one logical action into the ordered platform calls behind it. Every
//! call is a separate await point and can fail on its own; each is raced
//! against the workflow's cancellation token.

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use ctf_core::{
    Button, ButtonStyle, Channel, ChannelCreate, DomainError, Embed, MessageCreate,
    PermissionOverwrite, Permissions, Role, RoleCreate, Snowflake,
};

use super::cancel::step;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::journal::{ProvisionJournal, ProvisionedResource};

/// Resources backing a freshly provisioned CTF
#[derive(Debug, Clone)]
pub struct ProvisionedCtf {
    pub role: Role,
    pub category: Channel,
    pub registration: Channel,
    pub general: Channel,
    pub join_message_id: Snowflake,
    /// Everything created, in order
    pub journal: ProvisionJournal,
}

/// Treat a missing resource as removed
fn already_gone_ok(result: Result<(), DomainError>) -> Result<(), DomainError> {
    match result {
        Err(e) if e.is_not_found() => {
            warn!(error = %e, "Resource already removed");
            Ok(())
        }
        other => other,
    }
}

/// Custom id of the join button for `ctf_name`
pub fn join_custom_id(ctf_name: &str) -> String {
    format!("join/{ctf_name}")
}

/// Join message posted in the registration channel
pub fn join_message(ctf_name: &str) -> MessageCreate {
    MessageCreate::embeds(vec![Embed::new()
        .color(Embed::BLURPLE)
        .description(format!("Press the button to join `{ctf_name}`"))])
    .with_button(Button::new(
        ButtonStyle::Primary,
        format!("Join {ctf_name}"),
        join_custom_id(ctf_name),
    ))
}

/// Provisioner service
pub struct ProvisionerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProvisionerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // =========================================================================
    // CTF resources
    // =========================================================================

    /// Create the role, category, registration channel, join message and
    /// general channel of a CTF, in that order
    ///
    /// On failure the configured compensation policy is applied to whatever
    /// was already created and the step's error is returned.
    #[instrument(skip(self, token))]
    pub async fn provision_ctf(
        &self,
        name: &str,
        token: &CancellationToken,
    ) -> ServiceResult<ProvisionedCtf> {
        let mut journal = ProvisionJournal::new();

        match self.provision_steps(name, token, &mut journal).await {
            Ok((role, category, registration, join_message_id, general)) => {
                info!(
                    role_id = %role.id,
                    category_id = %category.id,
                    "CTF resources provisioned"
                );
                Ok(ProvisionedCtf {
                    role,
                    category,
                    registration,
                    general,
                    join_message_id,
                    journal,
                })
            }
            Err(e) => {
                self.compensate(&journal).await;
                Err(e.into())
            }
        }
    }

    async fn provision_steps(
        &self,
        name: &str,
        token: &CancellationToken,
        journal: &mut ProvisionJournal,
    ) -> Result<(Role, Channel, Channel, Snowflake, Channel), DomainError> {
        let platform = self.ctx.platform();
        let settings = self.ctx.settings();
        let everyone = platform.guild_id();

        // 1. Role
        let role = step(token, platform.create_role(&RoleCreate::mentionable(name))).await?;
        journal.record(ProvisionedResource::Role(role.id));

        // 2. Category, hidden from everyone but role holders
        let category = step(
            token,
            platform.create_channel(&ChannelCreate::category(
                name,
                vec![
                    PermissionOverwrite::role(
                        everyone,
                        Permissions::empty(),
                        Permissions::VIEW_CHANNEL,
                    ),
                    PermissionOverwrite::role(
                        role.id,
                        Permissions::ALL_TEXT | Permissions::ALL_VOICE,
                        Permissions::empty(),
                    ),
                ],
            )),
        )
        .await?;
        journal.record(ProvisionedResource::Channel {
            id: category.id,
            name: category.name.clone(),
        });

        // 3. Registration, readable by everyone
        let readable = Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY;
        let registration = step(
            token,
            platform.create_channel(
                &ChannelCreate::text(
                    settings.registration_channel.as_str(),
                    category.id,
                    vec![PermissionOverwrite::role(
                        everyone,
                        readable,
                        Permissions::all().difference(readable),
                    )],
                )
                .with_topic(format!("{name} player registration")),
            ),
        )
        .await?;
        journal.record(ProvisionedResource::Channel {
            id: registration.id,
            name: registration.name.clone(),
        });

        // 4. Join message
        let join_message_id = step(
            token,
            platform.create_message(registration.id, &join_message(name)),
        )
        .await?;

        // 5. General, role holders only
        let general = step(
            token,
            platform.create_channel(&ChannelCreate::text(
                settings.general_channel.as_str(),
                category.id,
                members_only(everyone, role.id),
            )),
        )
        .await?;
        journal.record(ProvisionedResource::Channel {
            id: general.id,
            name: general.name.clone(),
        });

        Ok((role, category, registration, join_message_id, general))
    }

    /// Apply the configured compensation policy to `journal`
    pub async fn compensate(&self, journal: &ProvisionJournal) {
        journal
            .compensate(self.ctx.platform(), self.ctx.settings().compensation)
            .await;
    }

    /// Delete every child of the category, the category, then the role
    ///
    /// A resource that is already gone counts as deleted, so a CTF whose
    /// channels or role were removed by hand can still be deleted.
    #[instrument(skip(self, token))]
    pub async fn deprovision_ctf(
        &self,
        category_id: Snowflake,
        role_id: Snowflake,
        token: &CancellationToken,
    ) -> ServiceResult<()> {
        let platform = self.ctx.platform();

        for child in platform.channels_in(category_id) {
            already_gone_ok(step(token, platform.delete_channel(child.id)).await)?;
        }
        already_gone_ok(step(token, platform.delete_channel(category_id)).await)?;
        already_gone_ok(step(token, platform.delete_role(role_id)).await)?;

        info!("CTF resources removed");
        Ok(())
    }

    // =========================================================================
    // Single-call actions
    // =========================================================================

    /// Set the member's roles to `current_roles` plus `role_id`
    #[instrument(skip(self, current_roles, token))]
    pub async fn grant_membership(
        &self,
        user_id: Snowflake,
        current_roles: &[Snowflake],
        role_id: Snowflake,
        token: &CancellationToken,
    ) -> ServiceResult<()> {
        let mut roles = current_roles.to_vec();
        roles.push(role_id);

        step(token, self.ctx.platform().set_member_roles(user_id, &roles)).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    pub async fn mark_channel_name(
        &self,
        channel_id: Snowflake,
        new_name: &str,
        token: &CancellationToken,
    ) -> ServiceResult<Channel> {
        Ok(step(token, self.ctx.platform().rename_channel(channel_id, new_name)).await?)
    }

    /// Text channel in the category, visible to role holders only
    #[instrument(skip(self, token))]
    pub async fn create_challenge_channel(
        &self,
        category_id: Snowflake,
        role_id: Snowflake,
        name: &str,
        token: &CancellationToken,
    ) -> ServiceResult<Channel> {
        let platform = self.ctx.platform();
        let channel = ChannelCreate::text(
            name,
            category_id,
            members_only(platform.guild_id(), role_id),
        );

        Ok(step(token, platform.create_channel(&channel)).await?)
    }
}

fn members_only(everyone: Snowflake, role_id: Snowflake) -> Vec<PermissionOverwrite> {
    vec![
        PermissionOverwrite::role(everyone, Permissions::empty(), Permissions::VIEW_CHANNEL),
        PermissionOverwrite::role(role_id, Permissions::ALL_TEXT, Permissions::empty()),
    ]
}
