//! CTF bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p ctf-bot
//! ```
//!
//! Configuration is loaded from `ctfbot.toml` (or `$CTFBOT_CONFIG`) and
//! `CTFBOT__*` environment variables.

use ctf_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.server.address(),
        "Starting CTF bot..."
    );

    if let Err(e) = ctf_bot::server::run(config).await {
        error!(code = e.error_code(), error = %e, "Bot stopped with an error");
        std::process::exit(1);
    }
}
