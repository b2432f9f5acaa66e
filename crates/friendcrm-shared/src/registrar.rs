use tracing::info;

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::models::Friend;
use crate::service::FriendService;
use crate::store::FriendStore;
use crate::types::{FriendId, PrincipalId};
use crate::validate::validate_new_friend;

impl<'a, S, C> FriendService<'a, S, C>
where
    S: FriendStore + ?Sized,
    C: Clock + ?Sized,
{
    /// Register a friend. The new friend starts out never contacted.
    pub fn add_friend(
        &self,
        principal: Option<&PrincipalId>,
        name: &str,
        frequency_days: Option<i64>,
    ) -> Result<FriendId> {
        let owner_id = self.scope(principal)?;
        let valid = validate_new_friend(name, frequency_days)?;

        let friend = Friend {
            id: FriendId::new(),
            name: valid.name,
            frequency_days: valid.frequency_days,
            last_contacted_at: None,
            owner_id,
        };

        self.store
            .insert_friend(&friend)
            .map_err(CoreError::storage)?;

        info!(
            friend_id = %friend.id,
            frequency_days = friend.frequency_days,
            "Friend added"
        );
        Ok(friend.id)
    }
}
