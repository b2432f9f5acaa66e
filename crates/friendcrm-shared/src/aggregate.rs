//! Interaction aggregation.
//!
//! Turns a raw interaction set into per-friend activity summaries: the capped
//! newest-first list shown on a roster entry and the "last called / last
//! messaged / last met" map.
//!
//! Ordering is `occurred_at` descending. Interactions sharing the same
//! `occurred_at` are ordered by interaction id ascending, so the result never
//! depends on the order the store happened to return rows in.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::constants::RECENT_INTERACTIONS_LIMIT;
use crate::models::Interaction;
use crate::types::{FriendId, InteractionType};

/// Aggregated activity of one friend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySummary {
    /// Newest first, at most [`RECENT_INTERACTIONS_LIMIT`] entries.
    pub recent: Vec<Interaction>,
    /// Most recent `occurred_at` for every type the friend has on record.
    pub last_by_type: BTreeMap<InteractionType, DateTime<Utc>>,
    /// Number of interactions seen before truncation.
    pub total: usize,
}

/// Sort newest first with the id tie-break.
pub fn sort_newest_first(interactions: &mut [Interaction]) {
    interactions.sort_by_key(|i| (Reverse(i.occurred_at), i.id));
}

/// Most recent `occurred_at` per type.
///
/// Scans newest first and keeps the first occurrence of each type, so the
/// input must already be in [`sort_newest_first`] order.
pub fn last_by_type(newest_first: &[Interaction]) -> BTreeMap<InteractionType, DateTime<Utc>> {
    let mut map = BTreeMap::new();
    for interaction in newest_first {
        map.entry(interaction.kind).or_insert(interaction.occurred_at);
    }
    map
}

fn summarize_owned(mut interactions: Vec<Interaction>) -> ActivitySummary {
    sort_newest_first(&mut interactions);
    let last_by_type = last_by_type(&interactions);
    let total = interactions.len();
    interactions.truncate(RECENT_INTERACTIONS_LIMIT);
    ActivitySummary {
        recent: interactions,
        last_by_type,
        total,
    }
}

/// Summarise the activity of `friend_id` out of an arbitrary interaction set.
///
/// Interactions that belong to other friends are ignored.
pub fn summarize<'a, I>(friend_id: FriendId, interactions: I) -> ActivitySummary
where
    I: IntoIterator<Item = &'a Interaction>,
{
    let own: Vec<Interaction> = interactions
        .into_iter()
        .filter(|i| i.friend_id == Some(friend_id))
        .cloned()
        .collect();
    summarize_owned(own)
}

/// Group a whole interaction set by friend in a single pass.
///
/// Orphaned interactions (`friend_id = None`) are dropped.
pub fn group_by_friend(interactions: Vec<Interaction>) -> HashMap<FriendId, ActivitySummary> {
    let mut buckets: HashMap<FriendId, Vec<Interaction>> = HashMap::new();
    for interaction in interactions {
        let Some(friend_id) = interaction.friend_id else {
            continue;
        };
        buckets.entry(friend_id).or_default().push(interaction);
    }

    buckets
        .into_iter()
        .map(|(friend_id, list)| (friend_id, summarize_owned(list)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InteractionId;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    fn interaction(friend: FriendId, kind: InteractionType, hours: i64) -> Interaction {
        Interaction {
            id: InteractionId::new(),
            friend_id: Some(friend),
            kind,
            occurred_at: base() + Duration::hours(hours),
            notes: None,
        }
    }

    #[test]
    fn test_empty_history() {
        let friend = FriendId::new();
        let summary = summarize(friend, &Vec::<Interaction>::new());
        assert_eq!(summary.total, 0);
        assert!(summary.recent.is_empty());
        assert!(summary.last_by_type.is_empty());
    }

    #[test]
    fn test_recent_is_capped_and_sorted() {
        let friend = FriendId::new();
        let all: Vec<_> = (0..25)
            .map(|h| interaction(friend, InteractionType::ALL[h as usize % 3], h * 7 % 25))
            .collect();

        let summary = summarize(friend, &all);
        assert_eq!(summary.total, 25);
        assert_eq!(summary.recent.len(), RECENT_INTERACTIONS_LIMIT);
        for pair in summary.recent.windows(2) {
            assert!(pair[0].occurred_at >= pair[1].occurred_at);
        }
        assert_eq!(summary.recent[0].occurred_at, base() + Duration::hours(24));
    }

    #[test]
    fn test_short_history_not_padded() {
        let friend = FriendId::new();
        let all = vec![
            interaction(friend, InteractionType::Call, 1),
            interaction(friend, InteractionType::Meet, 3),
        ];
        let summary = summarize(friend, &all);
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].kind, InteractionType::Meet);
    }

    #[test]
    fn test_last_by_type_is_max_per_type() {
        let friend = FriendId::new();
        let all = vec![
            interaction(friend, InteractionType::Call, 1),
            interaction(friend, InteractionType::Call, 5),
            interaction(friend, InteractionType::Message, 2),
            interaction(friend, InteractionType::Call, 3),
        ];
        let summary = summarize(friend, &all);

        assert_eq!(summary.last_by_type.len(), 2);
        assert_eq!(
            summary.last_by_type[&InteractionType::Call],
            base() + Duration::hours(5)
        );
        assert_eq!(
            summary.last_by_type[&InteractionType::Message],
            base() + Duration::hours(2)
        );
        assert!(!summary.last_by_type.contains_key(&InteractionType::Meet));
    }

    #[test]
    fn test_last_by_type_sees_past_the_cap() {
        let friend = FriendId::new();
        let mut all: Vec<_> = (10..30)
            .map(|h| interaction(friend, InteractionType::Message, h))
            .collect();
        all.push(interaction(friend, InteractionType::Meet, 0));

        let summary = summarize(friend, &all);
        assert!(summary.recent.iter().all(|i| i.kind == InteractionType::Message));
        assert_eq!(summary.last_by_type[&InteractionType::Meet], base());
    }

    #[test]
    fn test_ties_broken_by_id() {
        let friend = FriendId::new();
        let low = Interaction {
            id: InteractionId(Uuid::from_u128(1)),
            ..interaction(friend, InteractionType::Call, 4)
        };
        let high = Interaction {
            id: InteractionId(Uuid::from_u128(2)),
            ..interaction(friend, InteractionType::Message, 4)
        };

        let forward = summarize(friend, &[low.clone(), high.clone()]);
        let backward = summarize(friend, &[high.clone(), low.clone()]);
        assert_eq!(forward, backward);
        assert_eq!(forward.recent[0].id, low.id);
    }

    #[test]
    fn test_other_friends_filtered_out() {
        let alice = FriendId::new();
        let bob = FriendId::new();
        let all = vec![
            interaction(alice, InteractionType::Call, 1),
            interaction(bob, InteractionType::Meet, 2),
        ];
        let summary = summarize(alice, &all);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.recent[0].kind, InteractionType::Call);
    }

    #[test]
    fn test_group_by_friend_skips_orphans() {
        let alice = FriendId::new();
        let bob = FriendId::new();
        let mut orphan = interaction(alice, InteractionType::Call, 9);
        orphan.friend_id = None;

        let groups = group_by_friend(vec![
            interaction(alice, InteractionType::Call, 1),
            interaction(alice, InteractionType::Message, 2),
            interaction(bob, InteractionType::Meet, 3),
            orphan,
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&alice].total, 2);
        assert_eq!(groups[&alice].recent[0].kind, InteractionType::Message);
        assert_eq!(groups[&bob].total, 1);
    }
}
