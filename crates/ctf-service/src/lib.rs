//! # ctf-service
//!
//! Application layer: the guards every interaction passes, the provisioner
//! that drives the chat platform, and the CTF lifecycle and info workflows.
//!
//! Services borrow a shared [`ServiceContext`] and are cheap to construct per
//! call:
//!
//! ```rust,ignore
//! let guard = GuardService::new(&ctx).inside_ctf(&invocation).await?;
//! let reply = CtfService::new(&ctx).join(&invocation, &guard, "demoCTF", &token).await?;
//! ```

pub mod dto;
pub mod services;

pub use dto::{
    CreateCtfRequest, ListEventsRequest, NewChallengeRequest, Reply, ReplyMode,
    CHALLENGE_NAME_MAX_CHARS, CTF_NAME_MAX_CHARS,
};
pub use services::{
    BotSettings, CtfService, Guard, GuardContext, GuardService, InfoService, Invocation,
    ListingMode, ProvisionJournal, ProvisionedCtf, ProvisionedResource, ProvisionerService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UpcomingEvents,
    DELETE_CONFIRM_ID, INTERNAL_MESSAGE,
};
