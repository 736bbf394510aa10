//! Service context - dependency container for services
//!
//! Holds the repository, the chat platform, the event calendar, and the
//! injected clock, entropy and settings.

use std::sync::Arc;

use ctf_core::{
    ChatPlatform, Clock, CtfRepository, EntropySource, EventCalendar, SystemClock, ThreadEntropy,
};

use super::error::{ServiceError, ServiceResult};
use super::settings::BotSettings;

/// Service context containing all dependencies
///
/// Cloning is cheap; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Store
    ctf_repo: Arc<dyn CtfRepository>,

    // External collaborators
    platform: Arc<dyn ChatPlatform>,
    calendar: Arc<dyn EventCalendar>,

    // Determinism
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,

    settings: Arc<BotSettings>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        ctf_repo: Arc<dyn CtfRepository>,
        platform: Arc<dyn ChatPlatform>,
        calendar: Arc<dyn EventCalendar>,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
        settings: Arc<BotSettings>,
    ) -> Self {
        Self {
            ctf_repo,
            platform,
            calendar,
            clock,
            entropy,
            settings,
        }
    }

    /// Get the CTF repository
    pub fn ctf_repo(&self) -> &dyn CtfRepository {
        self.ctf_repo.as_ref()
    }

    /// Get the chat platform
    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    /// Get the event calendar
    pub fn calendar(&self) -> &dyn EventCalendar {
        self.calendar.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn entropy(&self) -> &dyn EntropySource {
        self.entropy.as_ref()
    }

    pub fn settings(&self) -> &BotSettings {
        self.settings.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("ctf_repo", &"dyn CtfRepository")
            .field("platform", &"dyn ChatPlatform")
            .field("calendar", &"dyn EventCalendar")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
///
/// The repository, platform and calendar are required. The clock and entropy
/// default to the system clock and thread RNG; settings default to
/// `BotSettings::default()`.
#[derive(Default)]
pub struct ServiceContextBuilder {
    ctf_repo: Option<Arc<dyn CtfRepository>>,
    platform: Option<Arc<dyn ChatPlatform>>,
    calendar: Option<Arc<dyn EventCalendar>>,
    clock: Option<Arc<dyn Clock>>,
    entropy: Option<Arc<dyn EntropySource>>,
    settings: Option<BotSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctf_repo(mut self, repo: Arc<dyn CtfRepository>) -> Self {
        self.ctf_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn calendar(mut self, calendar: Arc<dyn EventCalendar>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = Some(entropy);
        self
    }

    pub fn settings(mut self, settings: BotSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.ctf_repo
                .ok_or_else(|| ServiceError::validation("ctf_repo is required"))?,
            self.platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self.calendar
                .ok_or_else(|| ServiceError::validation("calendar is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.entropy.unwrap_or_else(|| Arc::new(ThreadEntropy)),
            Arc::new(self.settings.unwrap_or_default()),
        ))
    }
}
