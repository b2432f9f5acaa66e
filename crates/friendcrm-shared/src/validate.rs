//! Input validation for the mutating operations.
//!
//! Each function takes raw caller input and returns either a validated value
//! ready to be written or an [`CoreError::InvalidArgument`] describing the
//! first problem found. Nothing here touches the store.

use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_FREQUENCY_DAYS;
use crate::error::{CoreError, Result};
use crate::types::{FriendId, InteractionType};

/// A friend registration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFriend {
    pub name: String,
    pub frequency_days: u32,
}

pub fn validate_new_friend(name: &str, frequency_days: Option<i64>) -> Result<NewFriend> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidArgument("name must not be empty".into()));
    }

    let frequency_days = match frequency_days {
        None => DEFAULT_FREQUENCY_DAYS,
        Some(days) if days <= 0 => {
            return Err(CoreError::InvalidArgument(format!(
                "frequency_days must be a positive integer, got {days}"
            )));
        }
        Some(days) => u32::try_from(days).map_err(|_| {
            CoreError::InvalidArgument(format!("frequency_days {days} is too large"))
        })?,
    };

    Ok(NewFriend {
        name: name.to_string(),
        frequency_days,
    })
}

/// A request to record an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInteraction {
    pub friend_id: FriendId,
    pub kind: InteractionType,
    /// Defaults to the service clock when `None`.
    pub occurred_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl LogInteraction {
    pub fn new(friend_id: FriendId, kind: InteractionType) -> Self {
        Self {
            friend_id,
            kind,
            occurred_at: None,
            notes: None,
        }
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Build a request from untyped input (JSON bodies, CLI arguments).
    pub fn from_raw(
        friend_id: &str,
        kind: &str,
        occurred_at: Option<&str>,
        notes: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            friend_id: FriendId::parse(friend_id)?,
            kind: kind.parse()?,
            occurred_at: parse_occurred_at(occurred_at)?,
            notes,
        })
    }
}

/// Parse an optional RFC 3339 timestamp. Blank input counts as absent.
pub fn parse_occurred_at(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| CoreError::InvalidArgument(format!("invalid occurred_at '{raw}': {e}")))
}

/// Trim notes and collapse blank ones to `None`.
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
