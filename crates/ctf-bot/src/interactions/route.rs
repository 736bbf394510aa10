//! Route table
//!
//! Maps a decoded interaction to the workflow it triggers. Each route carries
//! its guard, fixed here at registration time.

use ctf_common::AppError;
use ctf_core::Marker;
use ctf_service::{CreateCtfRequest, Guard, NewChallengeRequest};

use super::payload::{Interaction, APPLICATION_COMMAND, MESSAGE_COMPONENT};

/// How the endpoint acknowledges a route within the platform's response window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Answer with the workflow's reply
    Immediate,
    /// "Thinking" placeholder visible to the invoker only, edited afterwards
    DeferredMessage,
    /// Keep the component's message as is, edit it afterwards
    DeferredUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Ping,
    Info { weeks: Option<u32> },
    Vote { weeks: Option<u32> },
    /// `new`: confirmation prompt
    New(CreateCtfRequest),
    /// `new/{ctf}/create[/{event}]` button
    Create(CreateCtfRequest),
    Open,
    Close,
    /// `delete`: confirmation prompt
    Delete,
    /// `delete/really` button
    DeleteConfirmed,
    /// `join/{ctf}` button
    Join { ctf: String },
    Mark(Marker),
    Chal(NewChallengeRequest),
}

impl Route {
    /// Resolve the route of a command or component interaction
    pub fn parse(interaction: &Interaction) -> Result<Self, AppError> {
        match interaction.kind {
            APPLICATION_COMMAND => Self::command(interaction),
            MESSAGE_COMPONENT => Self::component(interaction),
            other => Err(AppError::invalid_payload(format!(
                "unsupported interaction type {other}"
            ))),
        }
    }

    fn command(interaction: &Interaction) -> Result<Self, AppError> {
        let data = &interaction.data;
        let name = data
            .name
            .as_deref()
            .ok_or_else(|| AppError::invalid_payload("missing command name"))?;

        let required = |option: &str| {
            data.string_option(option)
                .ok_or_else(|| AppError::invalid_payload(format!("missing option `{option}`")))
        };
        let weeks = || {
            data.integer_option("weeks")
                .map(|w| u32::try_from(w).unwrap_or(0))
        };

        Ok(match name {
            "ping" => Self::Ping,
            "info" => Self::Info { weeks: weeks() },
            "vote" => Self::Vote { weeks: weeks() },
            "new" => Self::New(CreateCtfRequest::new(
                required("name")?,
                data.integer_option("event"),
            )),
            "open" => Self::Open,
            "close" => Self::Close,
            "delete" => Self::Delete,
            "flag" => Self::Mark(Marker::Flag),
            "blood" => Self::Mark(Marker::Blood),
            "chal" => Self::Chal(NewChallengeRequest {
                name: required("name")?,
            }),
            other => return Err(AppError::UnknownRoute(format!("/{other}"))),
        })
    }

    fn component(interaction: &Interaction) -> Result<Self, AppError> {
        let custom_id = interaction
            .data
            .custom_id
            .as_deref()
            .ok_or_else(|| AppError::invalid_payload("missing custom_id"))?;

        let parts: Vec<&str> = custom_id.split('/').collect();
        let route = match parts.as_slice() {
            ["new", ctf, "create"] => Self::Create(CreateCtfRequest::new(*ctf, None)),
            ["new", ctf, "create", event] => {
                let event_id = event
                    .parse()
                    .map_err(|_| AppError::invalid_payload(format!("bad event id `{event}`")))?;
                Self::Create(CreateCtfRequest::new(*ctf, Some(event_id)))
            }
            ["delete", "really"] => Self::DeleteConfirmed,
            ["join", ctf] => Self::Join {
                ctf: (*ctf).to_string(),
            },
            _ => return Err(AppError::UnknownRoute(custom_id.to_string())),
        };
        Ok(route)
    }

    /// Guard evaluated before the route's workflow
    pub fn guard(&self) -> Guard {
        match self {
            Self::Ping | Self::Info { .. } => Guard::Unrestricted,
            Self::New(_) | Self::Create(_) | Self::Vote { .. } => Guard::AdminOnly,
            Self::Open | Self::Close | Self::Delete | Self::DeleteConfirmed => {
                Guard::InsideCtfAndAdmin
            }
            Self::Join { .. } | Self::Mark(_) | Self::Chal(_) => Guard::InsideCtf,
        }
    }

    /// Routes that call the platform or the calendar more than trivially are
    /// deferred. Deferred messages are ephemeral, so a route whose reply is
    /// public stays immediate.
    pub fn acknowledgement(&self) -> Acknowledgement {
        match self {
            Self::Ping | Self::New(_) | Self::Delete | Self::Mark(_) => Acknowledgement::Immediate,
            Self::Create(_) | Self::DeleteConfirmed => Acknowledgement::DeferredUpdate,
            Self::Info { .. }
            | Self::Vote { .. }
            | Self::Open
            | Self::Close
            | Self::Join { .. }
            | Self::Chal(_) => Acknowledgement::DeferredMessage,
        }
    }

    /// Stable name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Info { .. } => "info",
            Self::Vote { .. } => "vote",
            Self::New(_) => "new",
            Self::Create(_) => "new/create",
            Self::Open => "open",
            Self::Close => "close",
            Self::Delete => "delete",
            Self::DeleteConfirmed => "delete/really",
            Self::Join { .. } => "join",
            Self::Mark(Marker::Flag) => "flag",
            Self::Mark(Marker::Blood) => "blood",
            Self::Chal(_) => "chal",
        }
    }
}
