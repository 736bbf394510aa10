//! Service layer - business logic implementation

mod cancel;
mod context;
mod ctf;
mod error;
mod guard;
mod info;
mod invocation;
mod journal;
mod provisioner;
mod settings;

pub use cancel::step;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use ctf::{create_custom_id, CtfService, DELETE_CONFIRM_ID};
pub use error::{ServiceError, ServiceResult, INTERNAL_MESSAGE};
pub use guard::{Guard, GuardContext, GuardService};
pub use info::{event_card, InfoService, ListingMode, UpcomingEvents};
pub use invocation::Invocation;
pub use journal::{ProvisionJournal, ProvisionedResource};
pub use provisioner::{join_custom_id, join_message, ProvisionedCtf, ProvisionerService};
pub use settings::BotSettings;
