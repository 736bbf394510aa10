//! Application configuration structs
//!
//! Loads configuration from an optional TOML file layered under environment
//! variables. Environment keys use the `CTFBOT__` prefix and `__` as the section
//! separator, e.g. `CTFBOT__DATABASE__URL` or `CTFBOT__DISCORD__BOT_TOKEN`.

use std::fmt;
use std::time::Duration;

use config::{Config, File, FileFormat};
use ctf_core::Snowflake;
use serde::Deserialize;

/// Environment variable naming the TOML file to load
pub const CONFIG_PATH_VAR: &str = "CTFBOT_CONFIG";

/// Default TOML file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "ctfbot.toml";

const ENV_PREFIX: &str = "CTFBOT";
const ENV_SEPARATOR: &str = "__";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    #[serde(default)]
    pub ctftime: CtftimeConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Interactions endpoint listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform configuration
#[derive(Clone, Deserialize)]
pub struct DiscordConfig {
    pub guild_id: Snowflake,
    pub application_id: Snowflake,
    pub bot_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_general_channel")]
    pub general_channel: String,
    #[serde(default = "default_registration_channel")]
    pub registration_channel: String,
    /// Extra channel names that can never be marked solved
    #[serde(default)]
    pub blocklist: Vec<String>,
    #[serde(default = "default_cache_refresh_secs")]
    pub cache_refresh_secs: u64,
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl DiscordConfig {
    pub fn cache_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.cache_refresh_secs.max(1))
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("guild_id", &self.guild_id)
            .field("application_id", &self.application_id)
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("general_channel", &self.general_channel)
            .field("registration_channel", &self.registration_channel)
            .field("blocklist", &self.blocklist)
            .field("cache_refresh_secs", &self.cache_refresh_secs)
            .field("register_commands", &self.register_commands)
            .finish()
    }
}

/// Event calendar client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CtftimeConfig {
    #[serde(default = "default_ctftime_base_url")]
    pub base_url: String,
    /// The calendar rejects unknown agents, so a curl-like one is sent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CtftimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_ctftime_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CtftimeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What to do with already-created resources when provisioning fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompensationPolicy {
    /// Leave them in place and log them for an operator
    #[default]
    Manual,
    /// Delete them in reverse creation order, logging failures
    BestEffort,
}

/// Interaction handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_timeout_secs")]
    pub interaction_timeout_secs: u64,
    #[serde(default)]
    pub compensation: CompensationPolicy,
    /// Window of the info and vote commands when no `weeks` option is given
    #[serde(default = "default_weeks")]
    pub default_weeks: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            interaction_timeout_secs: default_timeout_secs(),
            compensation: CompensationPolicy::default(),
            default_weeks: default_weeks(),
        }
    }
}

impl BotConfig {
    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_secs(self.interaction_timeout_secs)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "ctfbot".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_general_channel() -> String {
    "general".to_string()
}

fn default_registration_channel() -> String {
    "registration".to_string()
}

fn default_cache_refresh_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_ctftime_base_url() -> String {
    "https://ctftime.org/api/v1".to_string()
}

fn default_user_agent() -> String {
    "curl/8.5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_weeks() -> u32 {
    2
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from the TOML file and the environment
    ///
    /// A `.env` file is read first if present. The TOML file is optional; its
    /// path comes from `CTFBOT_CONFIG` and defaults to `ctfbot.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("discord.blocklist")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from TOML text only
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingVar("database.url"));
        }
        if self.discord.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingVar("discord.bot_token"));
        }
        if self.discord.guild_id.is_zero() {
            return Err(ConfigError::InvalidValue(
                "discord.guild_id",
                "must be a non-zero snowflake".to_string(),
            ));
        }
        if self.discord.general_channel == self.discord.registration_channel {
            return Err(ConfigError::InvalidValue(
                "discord.general_channel",
                "must differ from discord.registration_channel".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
