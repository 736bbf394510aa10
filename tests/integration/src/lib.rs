//! Integration test utilities for the CTF bot
//!
//! In-memory implementations of the store, chat platform and calendar ports,
//! plus a harness that wires them into a service context.

pub mod fakes;
pub mod fixtures;

pub use fakes::*;
pub use fixtures::*;
