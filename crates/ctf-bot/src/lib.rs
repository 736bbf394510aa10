//! # ctf-bot
//!
//! Interactions endpoint of the bot: decodes platform interaction payloads,
//! maps them to workflow routes, runs each one as its own task and renders the
//! reply. Also hosts the process bootstrap.

pub mod commands;
pub mod handlers;
pub mod interactions;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
