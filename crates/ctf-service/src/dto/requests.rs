//! Request DTOs
//!
//! Built by the transport from command options; validated before any workflow
//! touches the store or the platform.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Separator of component custom ids, which embed CTF names
const CUSTOM_ID_SEPARATOR: char = '/';

/// Longest accepted CTF name, in characters
///
/// Keeps `Join {name}` under the 80 character button label limit and
/// `new/{name}/create/{event}` under the 100 character custom id limit for any
/// `i64` event id.
pub const CTF_NAME_MAX_CHARS: u16 = 64;

/// Longest accepted challenge name; the platform's channel name limit
pub const CHALLENGE_NAME_MAX_CHARS: u16 = 100;

fn validate_ctf_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Name required.".into()));
    }
    if name.contains(CUSTOM_ID_SEPARATOR) {
        return Err(ValidationError::new("separator")
            .with_message(format!("CTF names cannot contain `{CUSTOM_ID_SEPARATOR}`.").into()));
    }
    Ok(())
}

// ============================================================================
// CTF Requests
// ============================================================================

/// `new` command and its confirmation button
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCtfRequest {
    #[validate(
        length(max = 64, message = "CTF names are at most 64 characters."),
        custom(function = "validate_ctf_name")
    )]
    pub name: String,

    /// CTFtime event the CTF comes from
    #[validate(range(min = 1, message = "CTFtime event ids are positive."))]
    pub event_id: Option<i64>,
}

impl CreateCtfRequest {
    pub fn new(name: impl Into<String>, event_id: Option<i64>) -> Self {
        Self {
            name: name.into(),
            event_id,
        }
    }
}

/// `chal` command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewChallengeRequest {
    #[validate(length(min = 1, max = 100, message = "Challenge names are 1-100 characters."))]
    pub name: String,
}

// ============================================================================
// Info Requests
// ============================================================================

/// `info` and `vote` commands
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ListEventsRequest {
    /// How many weeks ahead to look
    #[validate(range(min = 1, max = 52, message = "Weeks must be between 1 and 52."))]
    pub weeks: u32,
}
