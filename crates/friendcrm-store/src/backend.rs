//! [`FriendStore`] implementation backed by SQLite.
//!
//! Atomic batches run inside one transaction; any failing op rolls back every
//! write before it when the transaction guard is dropped.

use chrono::{DateTime, Utc};
use tracing::debug;

use friendcrm_shared::models::{Friend, Interaction};
use friendcrm_shared::store::{FriendFilter, FriendStore, InteractionFilter, WriteOp};
use friendcrm_shared::types::FriendId;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::{friends, interactions};

impl FriendStore for Database {
    type Error = StoreError;

    fn select_friends(&self, filter: &FriendFilter) -> Result<Vec<Friend>> {
        self.list_friends(filter.owner_id.as_ref())
    }

    fn select_friend(&self, id: FriendId) -> Result<Option<Friend>> {
        self.find_friend(id)
    }

    fn select_interactions(&self, filter: &InteractionFilter) -> Result<Vec<Interaction>> {
        match &filter.friend_ids {
            Some(ids) => self.list_interactions_for_friends(ids),
            None => self.list_interactions(),
        }
    }

    fn insert_friend(&self, friend: &Friend) -> Result<()> {
        self.create_friend(friend)
    }

    fn insert_interaction(&self, interaction: &Interaction) -> Result<()> {
        Database::insert_interaction(self, interaction)
    }

    fn update_friend_last_contacted(&self, id: FriendId, at: DateTime<Utc>) -> Result<()> {
        self.set_friend_last_contacted(id, at)
    }

    fn run_atomic(&self, ops: &[WriteOp]) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;

        for op in ops {
            match op {
                WriteOp::InsertFriend(friend) => friends::insert(&tx, friend)?,
                WriteOp::InsertInteraction(interaction) => interactions::insert(&tx, interaction)?,
                WriteOp::UpdateFriendLastContacted { friend_id, at } => {
                    friends::set_last_contacted(&tx, *friend_id, *at)?
                }
            }
        }

        tx.commit()?;
        debug!(ops = ops.len(), "atomic batch committed");
        Ok(())
    }
}
