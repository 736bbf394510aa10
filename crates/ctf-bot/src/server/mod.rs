//! Server setup and initialization
//!
//! Builds every collaborator from configuration, wires the service context
//! and runs the HTTP server until shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use ctf_common::{AppConfig, AppError, RateLimitConfig};
use ctf_ctftime::CtftimeClient;
use ctf_db::{create_pool, run_migrations, PgCtfRepository};
use ctf_discord::DiscordClient;
use ctf_service::{BotSettings, ServiceContextBuilder};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::commands;
use crate::interactions::{Dispatcher, ACK_DEADLINE};
use crate::middleware::apply_middleware_with_rate_limit;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Extra time the HTTP layer grants on top of the acknowledgement deadline
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(
    state: AppState,
    rate_limit: &RateLimitConfig,
    timeout: Duration,
) -> Result<Router, AppError> {
    let interactions = apply_middleware_with_rate_limit(create_router(), rate_limit, timeout)?;

    Ok(interactions.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
///
/// Background work (the snapshot refresh loop and interaction tasks) is
/// spawned on `tracker` and stops when `shutdown` is cancelled.
pub async fn create_app_state(
    config: &AppConfig,
    tracker: &TaskTracker,
    shutdown: &CancellationToken,
) -> Result<AppState, AppError> {
    // Database
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&ctf_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Chat platform
    let discord = Arc::new(
        DiscordClient::new(&config.discord).map_err(|e| AppError::Platform(e.to_string()))?,
    );
    discord
        .refresh()
        .await
        .map_err(|e| AppError::Platform(e.to_string()))?;
    info!(
        channels = discord.cache().channel_count(),
        roles = discord.cache().role_count(),
        "Guild snapshot loaded"
    );

    if config.discord.register_commands {
        discord
            .register_commands(&commands::definitions())
            .await
            .map_err(|e| AppError::Platform(e.to_string()))?;
        info!("Guild commands registered");
    } else {
        warn!("Command registration disabled");
    }

    // Calendar
    let ctftime =
        CtftimeClient::new(&config.ctftime).map_err(|e| AppError::Calendar(e.to_string()))?;

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .ctf_repo(Arc::new(PgCtfRepository::new(pool.clone())))
        .platform(discord.clone())
        .calendar(Arc::new(ctftime))
        .settings(BotSettings::from_config(config))
        .build()
        .map_err(|e| AppError::Server(e.to_string()))?;

    tracker.spawn(
        Arc::clone(&discord).run_refresh(config.discord.cache_refresh_interval(), shutdown.clone()),
    );

    let dispatcher = Dispatcher::new(
        Arc::new(service_context),
        discord,
        tracker.clone(),
        shutdown.clone(),
        config.bot.interaction_timeout(),
    );

    Ok(AppState::new(dispatcher, pool, config.discord.guild_id))
}

/// Run the HTTP server until `shutdown` is cancelled
pub async fn run_server(
    app: Router,
    address: &str,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete bot with configuration
///
/// Ctrl-C cancels the shutdown token; the server stops accepting requests and
/// in-flight interactions are awaited before returning.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let tracker = TaskTracker::new();
    let shutdown = CancellationToken::new();

    let state = create_app_state(&config, &tracker, &shutdown).await?;
    let timeout = ACK_DEADLINE + HTTP_TIMEOUT_SLACK;
    let app = create_app(state, &config.rate_limit, timeout)?;

    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for the shutdown signal"),
        }
    });

    let result = run_server(app, &config.server.address(), shutdown.clone()).await;

    shutdown.cancel();
    tracker.close();
    tracker.wait().await;
    info!("Shutdown complete");

    result
}
