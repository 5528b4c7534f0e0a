//! Card operations.
//!
//! Cards carry no owner of their own: every call re-checks the parent deck
//! against the access policy before touching the `cards` table.

use flashy_shared::{validation, Access, DeviceId};
use rusqlite::{params, Connection};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{decode_timestamp, decode_uuid, encode_timestamp, Database};
use crate::decks::now;
use crate::error::{not_found_if_empty, Result, StoreError};
use crate::Card;

impl Database {
    /// Cards of a readable deck, oldest first.
    pub fn list_cards(&self, deck_id: Uuid, caller: &DeviceId) -> Result<Vec<Card>> {
        self.require_deck(deck_id, caller, Access::Read)?;

        let mut stmt = self.conn().prepare(
            "SELECT id, deck_id, front, back, created_at
             FROM cards
             WHERE deck_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![deck_id.to_string()], row_to_card)?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        debug!(deck_id = %deck_id, count = cards.len(), "listed cards");
        Ok(cards)
    }

    /// Add a card to a deck the caller owns.
    pub fn create_card(
        &self,
        deck_id: Uuid,
        caller: &DeviceId,
        front: Option<&str>,
        back: Option<&str>,
    ) -> Result<Card> {
        self.require_deck(deck_id, caller, Access::Write)?;
        let (front, back) = validation::card_sides(front, back)?;

        let card = self.insert_card(deck_id, front, back)?;
        info!(deck_id = %deck_id, card_id = %card.id, "card created");
        Ok(card)
    }

    pub(crate) fn insert_card(&self, deck_id: Uuid, front: String, back: String) -> Result<Card> {
        insert_card_row(self.conn(), deck_id, front, back)
    }

    /// Replace front and back of a card in a deck the caller owns.
    pub fn update_card(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        caller: &DeviceId,
        front: Option<&str>,
        back: Option<&str>,
    ) -> Result<Card> {
        self.require_deck(deck_id, caller, Access::Write)?;
        let (front, back) = validation::card_sides(front, back)?;

        let card = self
            .conn()
            .query_row(
                "UPDATE cards SET front = ?1, back = ?2
                 WHERE id = ?3 AND deck_id = ?4
                 RETURNING id, deck_id, front, back, created_at",
                params![front, back, card_id.to_string(), deck_id.to_string()],
                row_to_card,
            )
            .map_err(not_found_if_empty)?;

        info!(deck_id = %deck_id, card_id = %card_id, "card updated");
        Ok(card)
    }

    /// Remove a card from a deck the caller owns.
    pub fn delete_card(&self, deck_id: Uuid, card_id: Uuid, caller: &DeviceId) -> Result<()> {
        self.require_deck(deck_id, caller, Access::Write)?;

        let affected = self.conn().execute(
            "DELETE FROM cards WHERE id = ?1 AND deck_id = ?2",
            params![card_id.to_string(), deck_id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }

        info!(deck_id = %deck_id, card_id = %card_id, "card deleted");
        Ok(())
    }
}

pub(crate) fn insert_card_row(
    conn: &Connection,
    deck_id: Uuid,
    front: String,
    back: String,
) -> Result<Card> {
    let card = Card {
        id: Uuid::new_v4(),
        deck_id,
        front,
        back,
        created_at: now(),
    };

    conn.execute(
        "INSERT INTO cards (id, deck_id, front, back, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            card.id.to_string(),
            card.deck_id.to_string(),
            card.front,
            card.back,
            encode_timestamp(card.created_at),
        ],
    )?;
    Ok(card)
}

fn row_to_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    let id_str: String = row.get(0)?;
    let deck_id_str: String = row.get(1)?;
    let front: String = row.get(2)?;
    let back: String = row.get(3)?;
    let created_str: String = row.get(4)?;

    Ok(Card {
        id: decode_uuid(0, &id_str)?,
        deck_id: decode_uuid(1, &deck_id_str)?,
        front,
        back,
        created_at: decode_timestamp(4, &created_str)?,
    })
}
