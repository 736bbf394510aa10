//! Application state
//!
//! Holds the shared state for the Axum application: the dispatcher, the
//! database pool pinged by readiness checks and the configured guild.

use std::sync::Arc;

use ctf_core::Snowflake;
use ctf_db::PgPool;

use crate::interactions::Dispatcher;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
    pool: PgPool,
    guild_id: Snowflake,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, pool: PgPool, guild_id: Snowflake) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            pool,
            guild_id,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Guild interactions are accepted from
    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &"Dispatcher")
            .field("guild_id", &self.guild_id)
            .finish()
    }
}
