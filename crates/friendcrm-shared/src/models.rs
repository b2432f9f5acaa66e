//! Domain records persisted by the store and handed to the presentation layer.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be returned
//! directly as JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FriendId, InteractionId, InteractionType, PrincipalId};

// ---------------------------------------------------------------------------
// Friend
// ---------------------------------------------------------------------------

/// A person the user wants to keep in touch with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: FriendId,
    /// Display name, never blank.
    pub name: String,
    /// Desired contact cadence in days, always >= 1.
    pub frequency_days: u32,
    /// Set by the interaction logger; `None` until the first interaction.
    pub last_contacted_at: Option<DateTime<Utc>>,
    /// Owning principal. Only populated in multi-tenant mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<PrincipalId>,
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// A recorded contact event. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    /// `None` only when the friend row was removed after the fact.
    pub friend_id: Option<FriendId>,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// RosterEntry (derived)
// ---------------------------------------------------------------------------

/// A friend joined with a summary of their recent activity.
///
/// Recomputed on every roster fetch, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(flatten)]
    pub friend: Friend,
    /// Newest first, at most `RECENT_INTERACTIONS_LIMIT` long.
    pub recent_interactions: Vec<Interaction>,
    /// Most recent `occurred_at` per interaction type.
    pub last_by_type: BTreeMap<InteractionType, DateTime<Utc>>,
}
