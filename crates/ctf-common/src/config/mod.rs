//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BotConfig, CompensationPolicy, ConfigError, CtftimeConfig,
    DatabaseConfig, DiscordConfig, Environment, RateLimitConfig, ServerConfig, CONFIG_PATH_VAR,
    DEFAULT_CONFIG_PATH,
};
