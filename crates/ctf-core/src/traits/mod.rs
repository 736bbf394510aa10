//! Ports implemented by infrastructure crates

mod calendar;
mod determinism;
mod platform;
mod repositories;

pub use calendar::EventCalendar;
pub use determinism::{Clock, EntropySource, SystemClock, ThreadEntropy};
pub use platform::ChatPlatform;
pub use repositories::{CtfRepository, RepoResult};
