//! Data transfer objects: validated requests and transport-neutral replies

mod requests;
mod responses;

pub use requests::{
    CreateCtfRequest, ListEventsRequest, NewChallengeRequest, CHALLENGE_NAME_MAX_CHARS,
    CTF_NAME_MAX_CHARS,
};
pub use responses::{Reply, ReplyMode};
