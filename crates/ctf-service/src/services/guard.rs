//! Authorization and context guards
//!
//! Every route is registered with one [`Guard`]. A guard either rejects the
//! invocation without side effects or lets it through, carrying whatever it
//! resolved on the way.

use tracing::{debug, instrument};

use ctf_core::{Channel, Ctf, DomainError};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::invocation::Invocation;

/// Guard configuration of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// No gate
    Unrestricted,
    /// Caller must be an administrator
    AdminOnly,
    /// Invoking channel must sit in a CTF's category
    InsideCtf,
    /// Administrator check first, then context
    InsideCtfAndAdmin,
}

/// What the context guard resolved
#[derive(Debug, Clone, PartialEq)]
pub struct GuardContext {
    pub ctf: Ctf,
    /// Category named after the CTF
    pub category: Channel,
    /// Channel the interaction was issued from
    pub channel: Channel,
}

/// Guard service
pub struct GuardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Evaluate `guard`, returning the CTF context when it resolves one
    pub async fn check(
        &self,
        guard: Guard,
        invocation: &Invocation,
    ) -> ServiceResult<Option<GuardContext>> {
        match guard {
            Guard::Unrestricted => Ok(None),
            Guard::AdminOnly => self.admin_only(invocation).map(|()| None),
            Guard::InsideCtf => self.inside_ctf(invocation).await.map(Some),
            Guard::InsideCtfAndAdmin => self.inside_ctf_and_admin(invocation).await.map(Some),
        }
    }

    /// Reject callers without the administrator capability
    pub fn admin_only(&self, invocation: &Invocation) -> ServiceResult<()> {
        if invocation.is_admin() {
            Ok(())
        } else {
            debug!(user_id = %invocation.user_id, "Rejected non-administrator");
            Err(DomainError::NotAdministrator.into())
        }
    }

    /// Resolve the CTF whose category contains the invoking channel
    ///
    /// Any broken link (channel not cached, no parent, parent not cached, no
    /// CTF with the parent's name) gives the same rejection. Store failures
    /// other than not-found propagate.
    #[instrument(skip(self, invocation), fields(channel_id = %invocation.channel_id))]
    pub async fn inside_ctf(&self, invocation: &Invocation) -> ServiceResult<GuardContext> {
        let platform = self.ctx.platform();

        let channel = platform
            .channel(invocation.channel_id)
            .ok_or(DomainError::NotInsideCtf)?;
        let category = channel
            .parent_id
            .and_then(|parent_id| platform.channel(parent_id))
            .ok_or(DomainError::NotInsideCtf)?;

        let ctf = match self.ctx.ctf_repo().find_by_name(&category.name).await {
            Ok(ctf) => ctf,
            Err(e) if e.is_not_found() => return Err(DomainError::NotInsideCtf.into()),
            Err(e) => return Err(e.into()),
        };

        Ok(GuardContext {
            ctf,
            category,
            channel,
        })
    }

    /// Administrator check, then context resolution
    pub async fn inside_ctf_and_admin(
        &self,
        invocation: &Invocation,
    ) -> ServiceResult<GuardContext> {
        self.admin_only(invocation)?;
        self.inside_ctf(invocation).await
    }
}
