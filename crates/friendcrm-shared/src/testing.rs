//! In-memory [`FriendStore`] used by the unit tests of this crate.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::aggregate::sort_newest_first;
use crate::models::{Friend, Interaction};
use crate::store::{FriendFilter, FriendStore, InteractionFilter, WriteOp};
use crate::types::FriendId;

#[derive(Error, Debug)]
pub enum MemoryStoreError {
    #[error("store offline")]
    Offline,
    #[error("duplicate friend {0}")]
    Duplicate(FriendId),
    #[error("no friend {0}")]
    Missing(FriendId),
    #[error("injected failure at op {0}")]
    Injected(usize),
}

#[derive(Debug, Clone, Default)]
struct Tables {
    friends: Vec<Friend>,
    interactions: Vec<Interaction>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: Mutex<bool>,
    fail_at_op: Mutex<Option<usize>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Make the next `run_atomic` fail right before applying op `index`.
    pub fn fail_at_op(&self, index: usize) {
        *self.fail_at_op.lock().unwrap() = Some(index);
    }

    pub fn friends(&self) -> Vec<Friend> {
        self.tables.lock().unwrap().friends.clone()
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.tables.lock().unwrap().interactions.clone()
    }

    /// Number of committed write calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn check_online(&self) -> Result<(), MemoryStoreError> {
        if *self.offline.lock().unwrap() {
            Err(MemoryStoreError::Offline)
        } else {
            Ok(())
        }
    }

    fn apply(tables: &mut Tables, op: &WriteOp) -> Result<(), MemoryStoreError> {
        match op {
            WriteOp::InsertFriend(friend) => {
                if tables.friends.iter().any(|f| f.id == friend.id) {
                    return Err(MemoryStoreError::Duplicate(friend.id));
                }
                tables.friends.push(friend.clone());
            }
            WriteOp::InsertInteraction(interaction) => {
                tables.interactions.push(interaction.clone());
            }
            WriteOp::UpdateFriendLastContacted { friend_id, at } => {
                let friend = tables
                    .friends
                    .iter_mut()
                    .find(|f| f.id == *friend_id)
                    .ok_or(MemoryStoreError::Missing(*friend_id))?;
                friend.last_contacted_at = Some(*at);
            }
        }
        Ok(())
    }
}

impl FriendStore for MemoryStore {
    type Error = MemoryStoreError;

    fn select_friends(&self, filter: &FriendFilter) -> Result<Vec<Friend>, Self::Error> {
        self.check_online()?;
        let mut friends: Vec<Friend> = self
            .friends()
            .into_iter()
            .filter(|f| filter.owner_id.is_none() || f.owner_id == filter.owner_id)
            .collect();
        // Stable sort keeps insertion order for ties; None sorts first.
        friends.sort_by_key(|f| f.last_contacted_at);
        Ok(friends)
    }

    fn select_friend(&self, id: FriendId) -> Result<Option<Friend>, Self::Error> {
        self.check_online()?;
        Ok(self.friends().into_iter().find(|f| f.id == id))
    }

    fn select_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, Self::Error> {
        self.check_online()?;
        let mut interactions: Vec<Interaction> = self
            .interactions()
            .into_iter()
            .filter(|i| match (&filter.friend_ids, i.friend_id) {
                (None, _) => true,
                (Some(ids), Some(fid)) => ids.contains(&fid),
                (Some(_), None) => false,
            })
            .collect();
        sort_newest_first(&mut interactions);
        Ok(interactions)
    }

    fn insert_friend(&self, friend: &Friend) -> Result<(), Self::Error> {
        self.run_atomic(&[WriteOp::InsertFriend(friend.clone())])
    }

    fn insert_interaction(&self, interaction: &Interaction) -> Result<(), Self::Error> {
        self.run_atomic(&[WriteOp::InsertInteraction(interaction.clone())])
    }

    fn update_friend_last_contacted(
        &self,
        id: FriendId,
        at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        self.run_atomic(&[WriteOp::UpdateFriendLastContacted { friend_id: id, at }])
    }

    fn run_atomic(&self, ops: &[WriteOp]) -> Result<(), Self::Error> {
        self.check_online()?;
        let fail_at = self.fail_at_op.lock().unwrap().take();

        let mut tables = self.tables.lock().unwrap();
        let mut staged = tables.clone();
        for (index, op) in ops.iter().enumerate() {
            if fail_at == Some(index) {
                return Err(MemoryStoreError::Injected(index));
            }
            Self::apply(&mut staged, op)?;
        }
        *tables = staged;
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}
