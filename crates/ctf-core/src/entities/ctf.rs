//! CTF entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// A competition session backed by a role and a channel category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ctf {
    /// Surrogate key assigned by the store, zero until created
    pub id: i64,
    /// Unique name, shared with the category on the platform
    pub name: String,
    pub start: DateTime<Utc>,
    /// Membership role gating the category
    pub role_id: Snowflake,
    /// Whether the join button currently grants the role
    pub can_join: bool,
    /// Originating calendar event, empty when created by hand
    pub ctftime_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ctf {
    /// Create an unsaved CTF; timestamps are set by the store
    pub fn new(name: impl Into<String>, role_id: Snowflake, start: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            start,
            role_id,
            can_join: true,
            ctftime_url: String::new(),
            created_at: start,
            updated_at: start,
        }
    }

    /// Set the calendar provenance link
    pub fn with_ctftime_url(mut self, url: impl Into<String>) -> Self {
        self.ctftime_url = url.into();
        self
    }

    /// Check the invariants enforced before every insert and update
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::CtfNameRequired);
        }
        if self.role_id.is_zero() {
            return Err(DomainError::RoleRequired);
        }
        Ok(())
    }

    /// Apply the fields present in `update`
    pub fn apply(&mut self, update: &CtfUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(role_id) = update.role_id {
            self.role_id = role_id;
        }
        if let Some(can_join) = update.can_join {
            self.can_join = can_join;
        }
        if let Some(url) = &update.ctftime_url {
            self.ctftime_url.clone_from(url);
        }
        if let Some(start) = update.start {
            self.start = start;
        }
    }
}

/// Filter for listing CTFs; set fields are AND-combined
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtfFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub role_id: Option<Snowflake>,
    pub can_join: Option<bool>,
    /// Zero means no limit
    pub limit: u32,
    pub offset: u32,
}

impl CtfFilter {
    /// Filter matching a single name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Whether `ctf` satisfies every set field (limit/offset ignored)
    pub fn matches(&self, ctf: &Ctf) -> bool {
        self.id.is_none_or(|id| ctf.id == id)
            && self.name.as_deref().is_none_or(|name| ctf.name == name)
            && self.role_id.is_none_or(|role_id| ctf.role_id == role_id)
            && self.can_join.is_none_or(|can_join| ctf.can_join == can_join)
    }
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtfUpdate {
    pub name: Option<String>,
    pub role_id: Option<Snowflake>,
    pub can_join: Option<bool>,
    pub ctftime_url: Option<String>,
    pub start: Option<DateTime<Utc>>,
}

impl CtfUpdate {
    /// Update that only toggles registration
    pub fn can_join(can_join: bool) -> Self {
        Self {
            can_join: Some(can_join),
            ..Self::default()
        }
    }
}
