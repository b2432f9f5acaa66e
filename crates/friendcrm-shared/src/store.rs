//! Storage collaborator interface.
//!
//! The core never talks to a database directly: every read and write goes
//! through [`FriendStore`]. Implementations own connection handling and map
//! their own failures onto `Self::Error`; the services turn any such error
//! into [`crate::CoreError::StorageUnavailable`].

use chrono::{DateTime, Utc};

use crate::models::{Friend, Interaction};
use crate::types::{FriendId, PrincipalId};

/// Which friends a roster read should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendFilter {
    /// Restrict to one owner. `None` returns every friend (single tenant).
    pub owner_id: Option<PrincipalId>,
}

/// Which interactions a roster read should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    /// Restrict to these friends. `None` returns the full set.
    pub friend_ids: Option<Vec<FriendId>>,
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    InsertFriend(Friend),
    InsertInteraction(Interaction),
    UpdateFriendLastContacted {
        friend_id: FriendId,
        at: DateTime<Utc>,
    },
}

pub trait FriendStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Friends ordered by `last_contacted_at` ascending, never-contacted
    /// first, ties in insertion order.
    fn select_friends(&self, filter: &FriendFilter) -> Result<Vec<Friend>, Self::Error>;

    fn select_friend(&self, id: FriendId) -> Result<Option<Friend>, Self::Error>;

    /// Interactions ordered by `occurred_at` descending, ties by id ascending.
    fn select_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, Self::Error>;

    /// Fails when a friend with the same id already exists.
    fn insert_friend(&self, friend: &Friend) -> Result<(), Self::Error>;

    fn insert_interaction(&self, interaction: &Interaction) -> Result<(), Self::Error>;

    /// Fails when no friend matched `id`.
    fn update_friend_last_contacted(
        &self,
        id: FriendId,
        at: DateTime<Utc>,
    ) -> Result<(), Self::Error>;

    /// Apply every op or none of them.
    fn run_atomic(&self, ops: &[WriteOp]) -> Result<(), Self::Error>;
}
