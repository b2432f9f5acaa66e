use rusqlite::{params, params_from_iter, Connection};

use friendcrm_shared::aggregate::sort_newest_first;
use friendcrm_shared::models::Interaction;
use friendcrm_shared::types::{FriendId, InteractionId, InteractionType};

use crate::convert::{decode_ts, decode_uuid, encode_ts};
use crate::database::Database;
use crate::error::Result;

const INTERACTION_COLUMNS: &str = "id, friend_id, type, occurred_at, notes";

// Keeps each IN (...) list well under SQLITE_MAX_VARIABLE_NUMBER.
const FRIEND_ID_CHUNK: usize = 500;

pub(crate) fn insert(conn: &Connection, interaction: &Interaction) -> Result<()> {
    conn.execute(
        "INSERT INTO interactions (id, friend_id, type, occurred_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            interaction.id.to_string(),
            interaction.friend_id.map(|f| f.to_string()),
            interaction.kind.as_str(),
            encode_ts(&interaction.occurred_at),
            interaction.notes,
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn insert_interaction(&self, interaction: &Interaction) -> Result<()> {
        insert(self.conn(), interaction)
    }

    /// Every interaction, newest first (ties by id).
    pub fn list_interactions(&self) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {INTERACTION_COLUMNS}
             FROM interactions
             ORDER BY occurred_at DESC, id ASC"
        ))?;
        let rows = stmt.query_map([], row_to_interaction)?;

        let mut interactions = Vec::new();
        for row in rows {
            interactions.push(row?);
        }
        Ok(interactions)
    }

    /// Interactions belonging to any of `friend_ids`, newest first.
    pub fn list_interactions_for_friends(
        &self,
        friend_ids: &[FriendId],
    ) -> Result<Vec<Interaction>> {
        let mut interactions = Vec::new();

        for chunk in friend_ids.chunks(FRIEND_ID_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn().prepare(&format!(
                "SELECT {INTERACTION_COLUMNS}
                 FROM interactions
                 WHERE friend_id IN ({placeholders})
                 ORDER BY occurred_at DESC, id ASC"
            ))?;

            let rows = stmt.query_map(
                params_from_iter(chunk.iter().map(|id| id.to_string())),
                row_to_interaction,
            )?;
            for row in rows {
                interactions.push(row?);
            }
        }

        // Chunks are each ordered; merge them back into one ordering.
        if friend_ids.len() > FRIEND_ID_CHUNK {
            sort_newest_first(&mut interactions);
        }
        Ok(interactions)
    }
}

fn row_to_interaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interaction> {
    let id_str: String = row.get(0)?;
    let friend_str: Option<String> = row.get(1)?;
    let type_str: String = row.get(2)?;
    let ts_str: String = row.get(3)?;
    let notes: Option<String> = row.get(4)?;

    let id = decode_uuid(0, &id_str)?;
    let friend_id = friend_str
        .map(|s| decode_uuid(1, &s))
        .transpose()?
        .map(FriendId);
    let kind: InteractionType = type_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let occurred_at = decode_ts(3, &ts_str)?;

    Ok(Interaction {
        id: InteractionId(id),
        friend_id,
        kind,
        occurred_at,
        notes,
    })
}
