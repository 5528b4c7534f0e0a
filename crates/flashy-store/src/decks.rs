//! Deck operations, each gated by the access policy.

use chrono::{DateTime, SubsecRound, Utc};
use flashy_shared::constants::{DEFAULT_DECK_COLOR, SYSTEM_OWNER};
use flashy_shared::{validation, Access, DeviceId, ValidationError};
use rusqlite::types::Type;
use rusqlite::{named_params, params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::access::{deck_filter, deck_permits};
use crate::database::{decode_timestamp, decode_uuid, encode_timestamp, Database};
use crate::error::{not_found_if_empty, Result, StoreError};
use crate::Deck;

/// Columns selected for a [`Deck`]; requires `LEFT JOIN cards` and `GROUP BY decks.id`.
const DECK_COLUMNS: &str = "decks.id, decks.device_id, decks.title, decks.description, \
     decks.color, decks.created_at, COUNT(cards.id) AS card_count, \
     decks.device_id = :system AS is_starter";

impl Database {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// The caller's own decks plus every starter deck.
    ///
    /// Starter decks come first; each group is ordered newest first.
    pub fn list_decks(&self, caller: &DeviceId) -> Result<Vec<Deck>> {
        let sql = format!(
            "SELECT {DECK_COLUMNS}
             FROM decks
             LEFT JOIN cards ON cards.deck_id = decks.id
             WHERE {}
             GROUP BY decks.id
             ORDER BY is_starter DESC, decks.created_at DESC, decks.rowid DESC",
            deck_filter(Access::Read)
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(
            named_params! { ":caller": caller.as_str(), ":system": SYSTEM_OWNER },
            row_to_deck,
        )?;

        let mut decks = Vec::new();
        for row in rows {
            decks.push(row?);
        }
        Ok(decks)
    }

    /// A single readable deck with its card count.
    pub fn get_deck(&self, deck_id: Uuid, caller: &DeviceId) -> Result<Deck> {
        let sql = format!(
            "SELECT {DECK_COLUMNS}
             FROM decks
             LEFT JOIN cards ON cards.deck_id = decks.id
             WHERE decks.id = :id AND {}
             GROUP BY decks.id",
            deck_filter(Access::Read)
        );
        self.conn()
            .query_row(
                &sql,
                named_params! {
                    ":id": deck_id.to_string(),
                    ":caller": caller.as_str(),
                    ":system": SYSTEM_OWNER,
                },
                row_to_deck,
            )
            .map_err(not_found_if_empty)
    }

    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    /// Create a deck owned by `caller`.
    pub fn create_deck(
        &self,
        caller: &DeviceId,
        title: Option<&str>,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Deck> {
        let title = validation::deck_title(title)?;
        if caller.is_system() {
            return Err(ValidationError::ReservedDeviceId.into());
        }
        let deck = self.insert_deck(caller, title, description, color)?;
        info!(deck_id = %deck.id, owner = %caller, "deck created");
        Ok(deck)
    }

    pub(crate) fn insert_deck(
        &self,
        owner: &DeviceId,
        title: String,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Deck> {
        insert_deck_row(self.conn(), owner, title, description, color)
    }

    /// Replace title and description of a deck the caller owns.
    ///
    /// A `None` description clears it.
    pub fn update_deck(
        &self,
        deck_id: Uuid,
        caller: &DeviceId,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Deck> {
        let title = validation::deck_title(title)?;

        let sql = format!(
            "UPDATE decks SET title = :title, description = :description
             WHERE id = :id AND {}",
            deck_filter(Access::Write)
        );
        let affected = self.conn().execute(
            &sql,
            named_params! {
                ":title": title,
                ":description": description,
                ":id": deck_id.to_string(),
                ":caller": caller.as_str(),
                ":system": SYSTEM_OWNER,
            },
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }

        info!(deck_id = %deck_id, "deck updated");
        self.get_deck(deck_id, caller)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a deck the caller owns together with all of its cards.
    ///
    /// Runs in a single transaction: either the deck and every card go, or
    /// nothing changes.
    pub fn delete_deck(&mut self, deck_id: Uuid, caller: &DeviceId) -> Result<()> {
        let tx = self.conn_mut().transaction()?;

        if !deck_permits(&tx, deck_id, caller, Access::Write)? {
            return Err(StoreError::NotFound);
        }

        let id = deck_id.to_string();
        let cards = tx.execute("DELETE FROM cards WHERE deck_id = ?1", params![id])?;
        tx.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
        tx.commit()?;

        info!(deck_id = %deck_id, cards, "deck deleted");
        Ok(())
    }
}

pub(crate) fn insert_deck_row(
    conn: &Connection,
    owner: &DeviceId,
    title: String,
    description: Option<&str>,
    color: Option<&str>,
) -> Result<Deck> {
    let deck = Deck {
        id: Uuid::new_v4(),
        owner_id: owner.clone(),
        title,
        description: description.map(str::to_string),
        color: color.unwrap_or(DEFAULT_DECK_COLOR).to_string(),
        created_at: now(),
        card_count: 0,
        is_starter: owner.is_system(),
    };

    conn.execute(
        "INSERT INTO decks (id, device_id, title, description, color, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            deck.id.to_string(),
            deck.owner_id.as_str(),
            deck.title,
            deck.description,
            deck.color,
            encode_timestamp(deck.created_at),
        ],
    )?;
    Ok(deck)
}

/// Current time at the precision stored in the database.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Map a row selected with [`DECK_COLUMNS`] to a [`Deck`].
fn row_to_deck(row: &rusqlite::Row<'_>) -> rusqlite::Result<Deck> {
    let id_str: String = row.get(0)?;
    let owner_str: String = row.get(1)?;
    let title: String = row.get(2)?;
    let description: Option<String> = row.get(3)?;
    let color: String = row.get(4)?;
    let created_str: String = row.get(5)?;
    let card_count: i64 = row.get(6)?;
    let is_starter: bool = row.get(7)?;

    let owner_id = DeviceId::parse(&owner_str)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(1, "device_id".into(), Type::Text))?;

    Ok(Deck {
        id: decode_uuid(0, &id_str)?,
        owner_id,
        title,
        description,
        color,
        created_at: decode_timestamp(5, &created_str)?,
        card_count,
        is_starter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{device, test_db};

    fn backdate(db: &Database, deck_id: Uuid, ts: &str) {
        db.conn()
            .execute(
                "UPDATE decks SET created_at = ?1 WHERE id = ?2",
                params![ts, deck_id.to_string()],
            )
            .unwrap();
    }

    #[test]
    fn create_trims_title_and_applies_default_color() {
        let (db, _dir) = test_db();
        let a = device("device-a");

        let deck = db
            .create_deck(&a, Some("  French Basics "), None, None)
            .unwrap();
        assert_eq!(deck.title, "French Basics");
        assert_eq!(deck.color, DEFAULT_DECK_COLOR);
        assert_eq!(deck.owner_id, a);
        assert!(!deck.is_starter);

        let stored = db.get_deck(deck.id, &a).unwrap();
        assert_eq!(stored, deck);
    }

    #[test]
    fn create_rejects_blank_title() {
        let (db, _dir) = test_db();
        let err = db
            .create_deck(&device("device-a"), Some("   "), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::TitleRequired)
        ));
        assert!(db.list_decks(&device("device-a")).unwrap().is_empty());
    }

    #[test]
    fn create_refuses_reserved_owner() {
        let (db, _dir) = test_db();
        let err = db
            .create_deck(&DeviceId::system(), Some("Sneaky"), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ReservedDeviceId)
        ));
    }

    #[test]
    fn other_callers_get_not_found() {
        let (mut db, _dir) = test_db();
        let a = device("device-a");
        let b = device("device-b");
        let deck = db.create_deck(&a, Some("Mine"), None, None).unwrap();

        assert!(matches!(db.get_deck(deck.id, &b), Err(StoreError::NotFound)));
        assert!(matches!(
            db.update_deck(deck.id, &b, Some("Theirs"), None),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(db.delete_deck(deck.id, &b), Err(StoreError::NotFound)));

        assert_eq!(db.get_deck(deck.id, &a).unwrap().title, "Mine");
    }

    #[test]
    fn starter_decks_are_readable_but_never_writable() {
        let (mut db, _dir) = test_db();
        let starter = db
            .insert_deck(&DeviceId::system(), "Starter".into(), None, None)
            .unwrap();

        for caller in [device("device-a"), DeviceId::system()] {
            let seen = db.get_deck(starter.id, &caller).unwrap();
            assert!(seen.is_starter);
            assert!(matches!(
                db.update_deck(starter.id, &caller, Some("Hijacked"), None),
                Err(StoreError::NotFound)
            ));
            assert!(matches!(
                db.delete_deck(starter.id, &caller),
                Err(StoreError::NotFound)
            ));
        }
        assert_eq!(
            db.get_deck(starter.id, &device("device-a")).unwrap().title,
            "Starter"
        );
    }

    #[test]
    fn update_round_trip_keeps_id() {
        let (db, _dir) = test_db();
        let a = device("device-a");
        let deck = db
            .create_deck(&a, Some("Old"), Some("desc"), Some("#000000"))
            .unwrap();

        let updated = db.update_deck(deck.id, &a, Some(" New "), None).unwrap();
        assert_eq!(updated.id, deck.id);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, None);
        assert_eq!(updated.color, "#000000");
        assert_eq!(updated.created_at, deck.created_at);

        let fetched = db.get_deck(deck.id, &a).unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn update_validates_title_before_touching_rows() {
        let (db, _dir) = test_db();
        let a = device("device-a");
        let deck = db.create_deck(&a, Some("Keep"), None, None).unwrap();
        assert!(matches!(
            db.update_deck(deck.id, &a, Some(""), None),
            Err(StoreError::Validation(ValidationError::TitleRequired))
        ));
        assert_eq!(db.get_deck(deck.id, &a).unwrap().title, "Keep");
    }

    #[test]
    fn list_puts_starters_first_then_newest_first() {
        let (db, _dir) = test_db();
        let a = device("device-a");
        let b = device("device-b");

        let old_mine = db.create_deck(&a, Some("old mine"), None, None).unwrap();
        let new_mine = db.create_deck(&a, Some("new mine"), None, None).unwrap();
        let _theirs = db.create_deck(&b, Some("theirs"), None, None).unwrap();
        let old_starter = db
            .insert_deck(&DeviceId::system(), "old starter".into(), None, None)
            .unwrap();
        let new_starter = db
            .insert_deck(&DeviceId::system(), "new starter".into(), None, None)
            .unwrap();

        // Insertion order deliberately disagrees with creation time.
        backdate(&db, new_mine.id, "2024-03-01T00:00:00.000000Z");
        backdate(&db, old_mine.id, "2024-01-01T00:00:00.000000Z");
        backdate(&db, new_starter.id, "2023-06-01T00:00:00.000000Z");
        backdate(&db, old_starter.id, "2023-01-01T00:00:00.000000Z");

        let ids: Vec<Uuid> = db.list_decks(&a).unwrap().iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![new_starter.id, old_starter.id, new_mine.id, old_mine.id]
        );
    }

    #[test]
    fn get_reports_card_count() {
        let (db, _dir) = test_db();
        let a = device("device-a");
        let deck = db.create_deck(&a, Some("Counted"), None, None).unwrap();
        db.create_card(deck.id, &a, Some("Hello"), Some("Bonjour"))
            .unwrap();
        db.create_card(deck.id, &a, Some("Thanks"), Some("Merci"))
            .unwrap();

        assert_eq!(db.get_deck(deck.id, &a).unwrap().card_count, 2);
        assert_eq!(db.list_decks(&a).unwrap()[0].card_count, 2);
    }

    #[test]
    fn delete_removes_deck_and_cards_together() {
        let (mut db, _dir) = test_db();
        let a = device("device-a");
        let deck = db.create_deck(&a, Some("French Basics"), None, None).unwrap();
        db.create_card(deck.id, &a, Some("Hello"), Some("Bonjour"))
            .unwrap();
        db.create_card(deck.id, &a, Some("Thanks"), Some("Merci"))
            .unwrap();

        db.delete_deck(deck.id, &a).unwrap();

        assert!(matches!(db.get_deck(deck.id, &a), Err(StoreError::NotFound)));
        assert!(matches!(
            db.list_cards(deck.id, &a),
            Err(StoreError::NotFound)
        ));
        let orphans: i64 = db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM cards WHERE deck_id = ?1",
                params![deck.id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
