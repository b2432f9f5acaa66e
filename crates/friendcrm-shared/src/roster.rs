//! Friend roster assembly: friends joined with their recent activity.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::group_by_friend;
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::models::{Friend, RosterEntry};
use crate::overdue::is_overdue;
use crate::service::FriendService;
use crate::store::{FriendFilter, FriendStore, InteractionFilter};
use crate::types::PrincipalId;

impl Friend {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.last_contacted_at, Some(self.frequency_days), now)
    }
}

impl RosterEntry {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.friend.is_overdue(now)
    }
}

impl<'a, S, C> FriendService<'a, S, C>
where
    S: FriendStore + ?Sized,
    C: Clock + ?Sized,
{
    /// Every friend visible to `principal`, never-contacted and
    /// least-recently-contacted first, each with its recent activity.
    ///
    /// The result has exactly one entry per friend. Any store failure aborts
    /// the whole read.
    pub fn get_friends(&self, principal: Option<&PrincipalId>) -> Result<Vec<RosterEntry>> {
        let owner_id = self.scope(principal)?;

        let friends = self
            .store
            .select_friends(&FriendFilter { owner_id })
            .map_err(CoreError::storage)?;

        if friends.is_empty() {
            debug!("roster empty");
            return Ok(Vec::new());
        }

        let friend_ids = friends.iter().map(|f| f.id).collect();
        let interactions = self
            .store
            .select_interactions(&InteractionFilter {
                friend_ids: Some(friend_ids),
            })
            .map_err(CoreError::storage)?;
        let interaction_count = interactions.len();

        let mut activity = group_by_friend(interactions);
        let roster: Vec<RosterEntry> = friends
            .into_iter()
            .map(|friend| {
                let summary = activity.remove(&friend.id).unwrap_or_default();
                RosterEntry {
                    friend,
                    recent_interactions: summary.recent,
                    last_by_type: summary.last_by_type,
                }
            })
            .collect();

        debug!(
            friends = roster.len(),
            interactions = interaction_count,
            "roster assembled"
        );
        Ok(roster)
    }

    /// Roster entries that are overdue right now, in roster order.
    pub fn overdue_friends(&self, principal: Option<&PrincipalId>) -> Result<Vec<RosterEntry>> {
        let now = self.now();
        Ok(self
            .get_friends(principal)?
            .into_iter()
            .filter(|entry| entry.is_overdue(now))
            .collect())
    }
}
