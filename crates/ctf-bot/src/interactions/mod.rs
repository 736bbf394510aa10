//! Interaction decoding, routing and dispatch

mod dispatcher;
mod followup;
mod payload;
mod route;

pub use dispatcher::{execute, Dispatcher, ACK_DEADLINE};
pub use followup::FollowUp;
pub use payload::{
    CommandOptionValue, Interaction, InteractionData, InteractionResponse, Member, User,
    APPLICATION_COMMAND, MESSAGE_COMPONENT, PING,
};
pub use route::{Acknowledgement, Route};
