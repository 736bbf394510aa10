//! # ctf-ctftime
//!
//! HTTP client for the public CTFtime API, implementing the `EventCalendar`
//! port from `ctf-core`.
//!
//! ```rust,ignore
//! use ctf_core::{EventCalendar, EventFilter};
//! use ctf_ctftime::CtftimeClient;
//!
//! let client = CtftimeClient::new(&config.ctftime)?;
//! let events = client.find_events(&EventFilter::default()).await?;
//! ```

pub mod client;
pub mod models;

pub use client::CtftimeClient;
pub use models::{EventModel, TeamModel};
