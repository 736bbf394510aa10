//! Workflow settings derived from configuration

use std::collections::HashSet;

use ctf_common::{AppConfig, CompensationPolicy};

/// Settings the workflows read; built once at startup
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Name of the members-only channel created in every CTF
    pub general_channel: String,
    /// Name of the public join channel created in every CTF
    pub registration_channel: String,
    /// Channel names that can never be marked solved
    pub blocklist: HashSet<String>,
    pub compensation: CompensationPolicy,
    /// Default look-ahead of `info` and `vote`
    pub default_weeks: u32,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::new("general", "registration", Vec::<String>::new())
    }
}

impl BotSettings {
    /// Settings with the given channel names and extra blocked names
    pub fn new(
        general_channel: impl Into<String>,
        registration_channel: impl Into<String>,
        blocklist: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let general_channel = general_channel.into();
        let registration_channel = registration_channel.into();

        let mut blocked: HashSet<String> = blocklist.into_iter().map(Into::into).collect();
        blocked.insert(general_channel.clone());
        blocked.insert(registration_channel.clone());

        Self {
            general_channel,
            registration_channel,
            blocklist: blocked,
            compensation: CompensationPolicy::default(),
            default_weeks: 2,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut settings = Self::new(
            config.discord.general_channel.as_str(),
            config.discord.registration_channel.as_str(),
            config.discord.blocklist.iter().map(String::as_str),
        );
        settings.compensation = config.bot.compensation;
        settings.default_weeks = config.bot.default_weeks;
        settings
    }

    pub fn with_compensation(mut self, compensation: CompensationPolicy) -> Self {
        self.compensation = compensation;
        self
    }

    /// Whether a channel with this name may be marked solved
    pub fn is_markable(&self, channel_name: &str) -> bool {
        !self.blocklist.contains(channel_name)
    }
}
