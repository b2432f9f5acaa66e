//! Interaction logging.
//!
//! Recording an interaction is the one consistency-critical write of the
//! system: the interaction row and the friend's `last_contacted_at` marker
//! are written in a single atomic batch, so a failure can never leave one
//! without the other.

use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::models::{Friend, Interaction};
use crate::service::FriendService;
use crate::store::{FriendStore, WriteOp};
use crate::types::{FriendId, InteractionId, PrincipalId};
use crate::validate::{normalize_notes, LogInteraction};

impl<'a, S, C> FriendService<'a, S, C>
where
    S: FriendStore + ?Sized,
    C: Clock + ?Sized,
{
    /// Look up a friend the principal is allowed to see.
    fn visible_friend(&self, principal: Option<&PrincipalId>, id: FriendId) -> Result<Friend> {
        let owner_id = self.scope(principal)?;
        self.store
            .select_friend(id)
            .map_err(CoreError::storage)?
            .filter(|friend| owner_id.is_none() || friend.owner_id == owner_id)
            .ok_or_else(|| CoreError::NotFound(format!("friend {id}")))
    }

    pub fn log_interaction(
        &self,
        principal: Option<&PrincipalId>,
        request: LogInteraction,
    ) -> Result<InteractionId> {
        let friend = self.visible_friend(principal, request.friend_id)?;

        let occurred_at = request.occurred_at.unwrap_or_else(|| self.clock.now());
        let interaction = Interaction {
            id: InteractionId::new(),
            friend_id: Some(friend.id),
            kind: request.kind,
            occurred_at,
            notes: normalize_notes(request.notes),
        };
        let id = interaction.id;

        let batch = [
            WriteOp::InsertInteraction(interaction),
            WriteOp::UpdateFriendLastContacted {
                friend_id: friend.id,
                at: occurred_at,
            },
        ];
        self.store.run_atomic(&batch).map_err(|e| {
            warn!(friend_id = %friend.id, error = %e, "interaction batch rolled back");
            CoreError::storage(e)
        })?;

        info!(
            interaction_id = %id,
            friend_id = %friend.id,
            kind = %request.kind,
            "Interaction logged"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::overdue::is_overdue;
    use crate::service::Tenancy;
    use crate::testing::MemoryStore;
    use crate::types::InteractionType;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 8, 30, 0).unwrap()
    }

    fn me() -> PrincipalId {
        PrincipalId::new("me")
    }

    #[test]
    fn test_bob_scenario() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);

        let bob = service.add_friend(Some(&me()), "Bob", None).unwrap();
        let call_id = service
            .log_interaction(Some(&me()), LogInteraction::new(bob, InteractionType::Call))
            .unwrap();

        let roster = service.get_friends(Some(&me())).unwrap();
        assert_eq!(roster.len(), 1);
        let entry = &roster[0];
        assert_eq!(entry.friend.last_contacted_at, Some(now()));
        assert_eq!(entry.recent_interactions.len(), 1);
        assert_eq!(entry.recent_interactions[0].id, call_id);
        assert_eq!(entry.recent_interactions[0].occurred_at, now());

        assert!(!entry.is_overdue(now()));
        assert!(!entry.is_overdue(now() + Duration::days(7)));
        assert!(entry.is_overdue(now() + Duration::days(7) + Duration::seconds(1)));
        assert!(is_overdue(
            entry.friend.last_contacted_at,
            Some(entry.friend.frequency_days),
            now() + Duration::days(8)
        ));
    }

    #[test]
    fn test_backdated_interaction() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);

        let ann = service.add_friend(Some(&me()), "Ann", Some(3)).unwrap();
        let when = now() - Duration::days(10);
        service
            .log_interaction(
                Some(&me()),
                LogInteraction::new(ann, InteractionType::Meet)
                    .at(when)
                    .with_notes("  dinner  "),
            )
            .unwrap();

        let stored = store.interactions();
        assert_eq!(stored[0].occurred_at, when);
        assert_eq!(stored[0].notes.as_deref(), Some("dinner"));
        assert_eq!(store.friends()[0].last_contacted_at, Some(when));
        assert!(store.friends()[0].is_overdue(now()));
    }

    #[test]
    fn test_unknown_friend_is_not_found_and_writes_nothing() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);

        let result = service.log_interaction(
            Some(&me()),
            LogInteraction::new(FriendId::new(), InteractionType::Message),
        );
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert_eq!(store.write_count(), 0);
        assert!(store.interactions().is_empty());
    }

    #[test]
    fn test_other_principals_friend_is_not_found() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);

        let theirs = service
            .add_friend(Some(&PrincipalId::new("them")), "Zed", None)
            .unwrap();
        let result = service.log_interaction(
            Some(&me()),
            LogInteraction::new(theirs, InteractionType::Call),
        );
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert!(store.interactions().is_empty());
        assert_eq!(store.friends()[0].last_contacted_at, None);
    }

    #[test]
    fn test_missing_principal_is_unauthorized() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);
        let ann = service.add_friend(Some(&me()), "Ann", None).unwrap();

        assert_eq!(
            service.log_interaction(None, LogInteraction::new(ann, InteractionType::Call)),
            Err(CoreError::Unauthorized)
        );
    }

    #[test]
    fn test_failure_between_writes_commits_nothing() {
        let store = MemoryStore::default();
        let clock = FixedClock(now());
        let service = FriendService::new(&store, &clock, Tenancy::Multi);
        let ann = service.add_friend(Some(&me()), "Ann", None).unwrap();

        // Fail after the interaction insert, before the friend update.
        store.fail_at_op(1);
        let result =
            service.log_interaction(Some(&me()), LogInteraction::new(ann, InteractionType::Call));
        assert!(matches!(result, Err(CoreError::StorageUnavailable(_))));

        assert!(store.interactions().is_empty());
        assert_eq!(store.friends()[0].last_contacted_at, None);

        // The store recovers and the next attempt commits both rows.
        service
            .log_interaction(Some(&me()), LogInteraction::new(ann, InteractionType::Call))
            .unwrap();
        assert_eq!(store.interactions().len(), 1);
        assert_eq!(store.friends()[0].last_contacted_at, Some(now()));
    }
}
