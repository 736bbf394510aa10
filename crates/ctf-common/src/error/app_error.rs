//! Application error types
//!
//! Errors raised while bootstrapping the process or handling a transport
//! request, before or around the service layer.

use serde::Serialize;
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown interaction route: {0}")]
    UnknownRoute(String),


    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidPayload(_) | Self::UnknownRoute(_) => 400,

            // 500 Internal Server Error
            Self::Database(_)
            | Self::Platform(_)
            | Self::Calendar(_)
            | Self::Config(_)
            | Self::Server(_) => 500,
        }
    }

    /// Get error code for responses and logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnknownRoute(_) => "UNKNOWN_ROUTE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Calendar(_) => "CALENDAR_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Create an invalid payload error
    #[must_use]
    pub fn invalid_payload(msg: impl fmt::Display) -> Self {
        Self::InvalidPayload(msg.to_string())
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // Server-side detail stays in the logs
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "Internal server error".to_string()
        };
        Self {
            code: err.error_code().to_string(),
            message,
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
