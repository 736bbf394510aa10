//! Error rendering
//!
//! Workflow failures become ephemeral replies the invoker sees; transport
//! failures (undecodable payloads, unknown routes) become HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ctf_common::{AppError, ErrorResponse};
use ctf_core::{DomainError, Embed, MessageCreate};
use ctf_service::{Reply, ServiceError};
use thiserror::Error;
use tracing::{error, warn};

const ERROR_TITLE: &str = ":octagonal_sign: There was an error while handling your request.";

/// Reply shown to the invoker when a workflow fails
///
/// Guard rejections and marking errors are plain text; everything else is
/// a red embed. Internal failures are logged with full detail and shown as
/// a generic notice.
pub fn error_reply(err: &ServiceError) -> Reply {
    if err.is_internal() {
        error!(code = err.error_code(), error = %err, "Interaction failed");
    }

    let plain = matches!(
        err,
        ServiceError::Domain(
            DomainError::NotAdministrator
                | DomainError::NotInsideCtf
                | DomainError::ChannelNotMarkable(_)
                | DomainError::AlreadySolved
        )
    );
    if plain {
        return Reply::text(err.user_message());
    }

    Reply::ephemeral(MessageCreate::embeds(vec![Embed::new()
        .title(ERROR_TITLE)
        .color(Embed::RED)
        .field("Message", err.user_message(), false)]))
}

/// Transport-level error of the interactions endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let Self::App(err) = &self;

        if status.is_server_error() {
            error!(code = err.error_code(), error = %err, "Request failed");
        } else {
            warn!(code = err.error_code(), error = %err, "Rejected interaction");
        }

        (status, Json(ErrorResponse::from(err))).into_response()
    }
}
