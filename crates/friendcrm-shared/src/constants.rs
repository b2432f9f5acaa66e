/// Application name
pub const APP_NAME: &str = "Friend CRM";

/// Contact cadence applied when a friend has none configured (days)
pub const DEFAULT_FREQUENCY_DAYS: u32 = 7;

/// Upper bound on the interactions attached to a roster entry
pub const RECENT_INTERACTIONS_LIMIT: usize = 10;

/// Milliseconds in one day, the unit of the overdue computation
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Label shown for a friend with no recorded interaction
pub const NEVER_CONTACTED: &str = "Never contacted";
