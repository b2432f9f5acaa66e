//! CRUD operations for [`Friend`] records.
//!
//! The free functions take a plain `&Connection` so they can run either
//! directly or inside a transaction; the `Database` methods wrap them.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use friendcrm_shared::models::Friend;
use friendcrm_shared::types::{FriendId, PrincipalId};

use crate::convert::{decode_ts, decode_uuid, encode_ts};
use crate::database::Database;
use crate::error::{Result, StoreError};

const FRIEND_COLUMNS: &str = "id, owner_id, name, frequency_days, last_contacted_at";

pub(crate) fn insert(conn: &Connection, friend: &Friend) -> Result<()> {
    conn.execute(
        "INSERT INTO friends (id, owner_id, name, frequency_days, last_contacted_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            friend.id.to_string(),
            friend.owner_id.as_ref().map(PrincipalId::as_str),
            friend.name,
            friend.frequency_days,
            friend.last_contacted_at.as_ref().map(encode_ts),
        ],
    )?;
    Ok(())
}

pub(crate) fn set_last_contacted(
    conn: &Connection,
    id: FriendId,
    at: DateTime<Utc>,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE friends SET last_contacted_at = ?1 WHERE id = ?2",
        params![encode_ts(&at), id.to_string()],
    )?;
    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new friend. Fails on a duplicate id.
    pub fn create_friend(&self, friend: &Friend) -> Result<()> {
        insert(self.conn(), friend)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single friend by id.
    pub fn find_friend(&self, id: FriendId) -> Result<Option<Friend>> {
        let friend = self
            .conn()
            .query_row(
                &format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE id = ?1"),
                params![id.to_string()],
                row_to_friend,
            )
            .optional()?;
        Ok(friend)
    }

    /// List friends, least recently contacted first.
    ///
    /// Never-contacted friends (NULL) sort before everyone else; ties keep
    /// insertion order. `owner_id = None` lists every friend.
    pub fn list_friends(&self, owner_id: Option<&PrincipalId>) -> Result<Vec<Friend>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {FRIEND_COLUMNS}
             FROM friends
             WHERE ?1 IS NULL OR owner_id = ?1
             ORDER BY last_contacted_at ASC, rowid ASC"
        ))?;

        let rows = stmt.query_map(params![owner_id.map(PrincipalId::as_str)], row_to_friend)?;

        let mut friends = Vec::new();
        for row in rows {
            friends.push(row?);
        }
        Ok(friends)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Set the last-contacted marker. Fails with `NotFound` for unknown ids.
    pub fn set_friend_last_contacted(&self, id: FriendId, at: DateTime<Utc>) -> Result<()> {
        set_last_contacted(self.conn(), id, at)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Friend`].
fn row_to_friend(row: &rusqlite::Row<'_>) -> rusqlite::Result<Friend> {
    let id_str: String = row.get(0)?;
    let owner_id: Option<String> = row.get(1)?;
    let name: String = row.get(2)?;
    let frequency_days: u32 = row.get(3)?;
    let last_str: Option<String> = row.get(4)?;

    let id = decode_uuid(0, &id_str)?;
    let last_contacted_at = last_str.map(|s| decode_ts(4, &s)).transpose()?;

    Ok(Friend {
        id: FriendId(id),
        name,
        frequency_days,
        last_contacted_at,
        owner_id: owner_id.map(PrincipalId),
    })
}
