//! Interactions endpoint

use axum::{extract::State, Json};

use crate::interactions::{Interaction, InteractionResponse, Route, PING};
use crate::response::ApiError;
use crate::state::AppState;

/// Answer one interaction
///
/// POST /interactions
pub async fn handle_interaction(
    State(state): State<AppState>,
    Json(interaction): Json<Interaction>,
) -> Result<Json<InteractionResponse>, ApiError> {
    if interaction.kind == PING {
        return Ok(Json(InteractionResponse::pong()));
    }

    let invocation = interaction.invocation(state.guild_id())?;
    let route = Route::parse(&interaction)?;

    let response = state
        .dispatcher()
        .respond(interaction.token, invocation, route)
        .await;
    Ok(Json(response))
}
