//! Domain errors - error types for the domain layer
//!
//! Every variant carries a message that is safe to show to the invoking user,
//! except the infrastructure variants, which are classified as
//! [`ErrorKind::Internal`] and are only logged.

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Coarse classification used for reply rendering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input or a failed entity invariant
    Invalid,
    /// A referenced CTF, channel, role or event does not exist
    NotFound,
    /// The action would duplicate existing state
    Conflict,
    /// A capability or context gate rejected the caller
    Unauthorized,
    /// Unexpected collaborator failure
    Internal,
}

impl ErrorKind {
    /// Stable lowercase name, used as a log field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal",
        }
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("CTF `{0}` not found.")]
    CtfNotFound(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Event not found.")]
    EventNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Name required.")]
    CtfNameRequired,

    #[error("Player role required.")]
    RoleRequired,

    #[error("Challenge name required.")]
    ChallengeNameRequired,

    #[error("{0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You're not authorized to run this command.")]
    NotAdministrator,

    #[error("You're not inside a CTF, you cannot issue this command.")]
    NotInsideCtf,

    #[error("Registrations are closed for `{0}`.")]
    RegistrationClosed(String),

    #[error("You cannot flag in this channel!")]
    ChannelNotMarkable(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("CTF `{0}` already exists.")]
    CtfAlreadyExists(String),

    #[error("You already joined CTF `{0}`.")]
    AlreadyJoined(String),

    #[error("Someone has already flagged this!")]
    AlreadySolved,

    #[error("Channel `{0}` already exists.")]
    ChallengeExists(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Calendar error: {0}")]
    CalendarError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CtfNotFound(_)
            | Self::ChannelNotFound(_)
            | Self::RoleNotFound(_)
            | Self::EventNotFound(_) => ErrorKind::NotFound,

            Self::CtfNameRequired
            | Self::RoleRequired
            | Self::ChallengeNameRequired
            | Self::ValidationError(_) => ErrorKind::Invalid,

            Self::NotAdministrator
            | Self::NotInsideCtf
            | Self::RegistrationClosed(_)
            | Self::ChannelNotMarkable(_) => ErrorKind::Unauthorized,

            Self::CtfAlreadyExists(_)
            | Self::AlreadyJoined(_)
            | Self::AlreadySolved
            | Self::ChallengeExists(_) => ErrorKind::Conflict,

            Self::DatabaseError(_)
            | Self::PlatformError(_)
            | Self::CalendarError(_)
            | Self::Cancelled
            | Self::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Get an error code string for logs and replies
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CtfNotFound(_) => "UNKNOWN_CTF",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",

            // Validation
            Self::CtfNameRequired => "CTF_NAME_REQUIRED",
            Self::RoleRequired => "ROLE_REQUIRED",
            Self::ChallengeNameRequired => "CHALLENGE_NAME_REQUIRED",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Authorization
            Self::NotAdministrator => "NOT_ADMINISTRATOR",
            Self::NotInsideCtf => "NOT_INSIDE_CTF",
            Self::RegistrationClosed(_) => "REGISTRATION_CLOSED",
            Self::ChannelNotMarkable(_) => "CHANNEL_NOT_MARKABLE",

            // Conflict
            Self::CtfAlreadyExists(_) => "CTF_ALREADY_EXISTS",
            Self::AlreadyJoined(_) => "ALREADY_JOINED",
            Self::AlreadySolved => "ALREADY_SOLVED",
            Self::ChallengeExists(_) => "CHALLENGE_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::PlatformError(_) => "PLATFORM_ERROR",
            Self::CalendarError(_) => "CALENDAR_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Invalid
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Check if this is an internal error
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
