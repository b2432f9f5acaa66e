//! Human-readable labels for roster cards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::constants::NEVER_CONTACTED;
use crate::models::Interaction;
use crate::types::InteractionType;

pub fn interaction_label(kind: InteractionType) -> &'static str {
    match kind {
        InteractionType::Call => "Called",
        InteractionType::Message => "Messaged",
        InteractionType::Meet => "Met",
    }
}

/// Short relative description of `at` as seen from `now`.
///
/// Timestamps in the future read as "Just now". Anything a month or older
/// falls back to a plain `M/D/YYYY` date.
pub fn format_relative_date(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "Never".to_string();
    };

    let diff_ms = (now - at).num_milliseconds();
    let mins = diff_ms.div_euclid(60_000);
    let hours = diff_ms.div_euclid(3_600_000);
    let days = diff_ms.div_euclid(86_400_000);

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days}d ago")
    } else if days < 30 {
        format!("{}w ago", days / 7)
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}

/// "Called 3d ago" for the newest interaction, or "Never contacted".
pub fn last_contact_label(newest_first: &[Interaction], now: DateTime<Utc>) -> String {
    match newest_first.first() {
        Some(latest) => format!(
            "{} {}",
            interaction_label(latest.kind),
            format_relative_date(Some(latest.occurred_at), now)
        ),
        None => NEVER_CONTACTED.to_string(),
    }
}

pub fn cadence_label(frequency_days: u32) -> String {
    format!("Every {frequency_days}d")
}

/// One "Met 2w ago" line per interaction type, most recent first.
pub fn activity_lines(
    last_by_type: &BTreeMap<InteractionType, DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut entries: Vec<_> = last_by_type.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(kind, at)| {
            format!(
                "{} {}",
                interaction_label(*kind),
                format_relative_date(Some(*at), now)
            )
        })
        .collect()
}

/// Palette for friend avatars, picked by a stable hash of the name.
pub const AVATAR_COLORS: [&str; 8] = [
    "rose", "sky", "amber", "emerald", "violet", "pink", "teal", "orange",
];

// 31-based rolling hash over UTF-16 units, wrapping at 32 bits.
fn name_hash(name: &str) -> u32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Avatar colour for a friend. The same name always gets the same colour.
pub fn avatar_color(name: &str) -> &'static str {
    AVATAR_COLORS[name_hash(name) as usize % AVATAR_COLORS.len()]
}

/// Upper-cased first character of the name, empty for an empty name.
pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
