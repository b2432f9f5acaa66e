//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `friends` and `interactions`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Friends
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS friends (
    id                TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    owner_id          TEXT,                        -- principal id, NULL in single-tenant mode
    name              TEXT NOT NULL CHECK (length(trim(name)) > 0),
    frequency_days    INTEGER NOT NULL DEFAULT 7 CHECK (frequency_days >= 1),
    last_contacted_at TEXT                         -- RFC-3339, NULL until first contact
);

CREATE INDEX IF NOT EXISTS idx_friends_owner_last_contacted
    ON friends(owner_id, last_contacted_at);

-- ----------------------------------------------------------------
-- Interactions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS interactions (
    id          TEXT PRIMARY KEY NOT NULL,         -- UUID v4
    friend_id   TEXT,                              -- nullable FK -> friends(id)
    type        TEXT NOT NULL CHECK (type IN ('call', 'message', 'meet')),
    occurred_at TEXT NOT NULL,                     -- RFC-3339
    notes       TEXT,

    FOREIGN KEY (friend_id) REFERENCES friends(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_interactions_friend_ts
    ON interactions(friend_id, occurred_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
