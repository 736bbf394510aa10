//! Clock and entropy abstractions
//!
//! In production these wrap the system clock and the thread RNG. Tests inject
//! fixed implementations.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Abstraction over system time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of arbitrary values for cosmetic choices (cheer phrases)
pub trait EntropySource: Send + Sync {
    fn next_u32(&self) -> u32;
}

/// Entropy backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn next_u32(&self) -> u32 {
        rand::thread_rng().gen()
    }
}
