//! CTF lifecycle service
//!
//! Create, open/close, join, mark solved, challenge channels and delete. Each
//! workflow runs its steps strictly in order and stops at the first failure;
//! nothing here retries.

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use ctf_core::{
    cheer, logical_channel_name, Button, ButtonStyle, Ctf, CtfUpdate, DomainError, Embed, Marker,
    MessageCreate,
};

use super::cancel::step;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::GuardContext;
use super::invocation::Invocation;
use super::provisioner::ProvisionerService;
use crate::dto::{CreateCtfRequest, NewChallengeRequest, Reply};

/// Custom id of the delete confirmation button
pub const DELETE_CONFIRM_ID: &str = "delete/really";

/// Custom id of the create confirmation button
pub fn create_custom_id(request: &CreateCtfRequest) -> String {
    match request.event_id {
        Some(event_id) => format!("new/{}/create/{event_id}", request.name),
        None => format!("new/{}/create", request.name),
    }
}

/// CTF lifecycle service
pub struct CtfService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CtfService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn provisioner(&self) -> ProvisionerService<'a> {
        ProvisionerService::new(self.ctx)
    }

    /// Fail with a conflict when a CTF named `name` is already stored
    async fn ensure_absent(&self, name: &str, token: &CancellationToken) -> ServiceResult<()> {
        match step(token, self.ctx.ctf_repo().find_by_name(name)).await {
            Ok(_) => Err(DomainError::CtfAlreadyExists(name.to_string()).into()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// First phase of `new`: ask for confirmation
    pub async fn confirm_create(
        &self,
        request: &CreateCtfRequest,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        request.validate()?;
        self.ensure_absent(&request.name, token).await?;

        let message = MessageCreate::embeds(vec![Reply::notice_embed(format!(
            "Would you like to create a new CTF named `{}`?",
            request.name
        ))])
        .with_button(Button::new(
            ButtonStyle::Success,
            "Yes, create it",
            create_custom_id(request),
        ));

        Ok(Reply::ephemeral(message))
    }

    /// Provision the CTF's platform resources, then store its record
    ///
    /// The name check is read-then-write; the store's unique constraint is the
    /// real serialization point. When the insert fails the compensation policy
    /// is applied to the provisioned resources.
    #[instrument(skip(self, invocation, token), fields(user_id = %invocation.user_id))]
    pub async fn create(
        &self,
        invocation: &Invocation,
        request: &CreateCtfRequest,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        request.validate()?;
        let name = request.name.as_str();

        self.ensure_absent(name, token).await?;

        let (start, ctftime_url) = match request.event_id {
            Some(event_id) => {
                let event = step(token, self.ctx.calendar().find_event(event_id)).await?;
                (event.start, event.ctftime_url)
            }
            None => (self.ctx.clock().now(), String::new()),
        };

        let provisioned = self.provisioner().provision_ctf(name, token).await?;

        let mut ctf = Ctf::new(name, provisioned.role.id, start).with_ctftime_url(ctftime_url);
        if let Err(e) = step(token, self.ctx.ctf_repo().create(&mut ctf)).await {
            self.provisioner().compensate(&provisioned.journal).await;
            return Err(e.into());
        }

        info!(
            ctf_id = ctf.id,
            ctf = %ctf.name,
            role_id = %ctf.role_id,
            "CTF created"
        );

        Ok(Reply::update(MessageCreate::embeds(vec![Reply::success_embed(
            format!("CTF `{name}` was successfully created!"),
        )])))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// `open` and `close`
    #[instrument(skip(self, guard, token), fields(ctf = %guard.ctf.name))]
    pub async fn set_can_join(
        &self,
        guard: &GuardContext,
        can_join: bool,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        let ctf = step(
            token,
            self.ctx
                .ctf_repo()
                .update(&guard.ctf.name, &CtfUpdate::can_join(can_join)),
        )
        .await?;

        info!(can_join, "CTF registration updated");

        Ok(Reply::success(format!(
            "You successfully set registrations for CTF `{}` to {}.",
            ctf.name, ctf.can_join
        )))
    }

    /// Grant the CTF's role to the caller
    ///
    /// `requested` is the CTF name carried by the pressed button; it has to
    /// match the CTF the button was pressed in.
    #[instrument(skip(self, invocation, guard, token), fields(user_id = %invocation.user_id, ctf = %guard.ctf.name))]
    pub async fn join(
        &self,
        invocation: &Invocation,
        guard: &GuardContext,
        requested: &str,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        let ctf = &guard.ctf;

        if requested != ctf.name {
            return Err(ServiceError::validation(format!(
                "This button does not belong to CTF `{}`.",
                ctf.name
            )));
        }
        if !ctf.can_join {
            return Err(DomainError::RegistrationClosed(ctf.name.clone()).into());
        }

        let role = self
            .ctx
            .platform()
            .role(ctf.role_id)
            .ok_or(DomainError::RoleNotFound(ctf.role_id))?;

        if invocation.has_role(role.id) {
            return Err(DomainError::AlreadyJoined(ctf.name.clone()).into());
        }

        self.provisioner()
            .grant_membership(invocation.user_id, &invocation.role_ids, role.id, token)
            .await?;

        info!("Member joined CTF");

        Ok(Reply::success(format!(
            "You successfully joined CTF `{}`.",
            ctf.name
        )))
    }

    // =========================================================================
    // Challenges
    // =========================================================================

    /// `flag` and `blood`: prefix the channel name and cheer publicly
    #[instrument(skip(self, invocation, guard, token), fields(channel = %guard.channel.name))]
    pub async fn mark_solved(
        &self,
        invocation: &Invocation,
        guard: &GuardContext,
        marker: Marker,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        let channel = &guard.channel;

        if !self.ctx.settings().is_markable(&channel.name) {
            return Err(DomainError::ChannelNotMarkable(channel.name.clone()).into());
        }
        if Marker::is_marked(&channel.name) {
            return Err(DomainError::AlreadySolved.into());
        }

        self.provisioner()
            .mark_channel_name(channel.id, &marker.apply(&channel.name), token)
            .await?;

        info!(user_id = %invocation.user_id, ?marker, "Challenge marked solved");

        let notice = format!(
            "{} {}! {} has flagged {}.",
            marker.glyph(),
            cheer(self.ctx.entropy().next_u32()),
            invocation.mention(),
            channel.name
        );
        Ok(Reply::public(MessageCreate::content(notice)))
    }

    /// `chal`: open a role-scoped channel for a new challenge
    #[instrument(skip(self, guard, token), fields(ctf = %guard.ctf.name))]
    pub async fn new_challenge(
        &self,
        guard: &GuardContext,
        request: &NewChallengeRequest,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        let logical = logical_channel_name(&request.name);
        if logical.is_empty() {
            return Err(DomainError::ChallengeNameRequired.into());
        }
        request.validate()?;

        let platform = self.ctx.platform();
        if platform
            .channels_in(guard.category.id)
            .iter()
            .any(|sibling| logical_channel_name(&sibling.name) == logical)
        {
            return Err(DomainError::ChallengeExists(logical).into());
        }

        let channel = self
            .provisioner()
            .create_challenge_channel(guard.category.id, guard.ctf.role_id, &logical, token)
            .await?;

        info!(channel_id = %channel.id, "Challenge channel created");

        Ok(Reply::success(format!(
            "Channel <#{}> was successfully created.",
            channel.id
        )))
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// First phase of `delete`: ask for confirmation
    pub fn confirm_delete(&self, guard: &GuardContext) -> Reply {
        let message = MessageCreate::embeds(vec![Embed::new().color(Embed::RED).description(
            format!(
                "Would you like to delete CTF `{}`? Its channels and role are removed as well.",
                guard.ctf.name
            ),
        )])
        .with_button(Button::new(
            ButtonStyle::Danger,
            "Yes, delete it",
            DELETE_CONFIRM_ID,
        ));

        Reply::ephemeral(message)
    }

    /// Tear down the CTF's platform resources, then its record
    ///
    /// A failed teardown keeps the record. Running `delete` again from any
    /// channel still under the category finishes the job; resources already
    /// gone are skipped.
    #[instrument(skip(self, guard, token), fields(ctf = %guard.ctf.name))]
    pub async fn delete(
        &self,
        guard: &GuardContext,
        token: &CancellationToken,
    ) -> ServiceResult<Reply> {
        let ctf = &guard.ctf;

        self.provisioner()
            .deprovision_ctf(guard.category.id, ctf.role_id, token)
            .await?;
        step(token, self.ctx.ctf_repo().delete(&ctf.name)).await?;

        info!(ctf_id = ctf.id, "CTF deleted");

        Ok(Reply::update(MessageCreate::embeds(vec![Reply::success_embed(
            format!("CTF `{}` was successfully deleted.", ctf.name),
        )])))
    }

    pub fn ping(&self) -> Reply {
        Reply::public(MessageCreate::content("pong"))
    }
}
