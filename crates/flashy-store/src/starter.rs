//! Starter decks: read-only content owned by the reserved system identity.
//!
//! Seeding is the only path that creates decks for
//! [`SYSTEM_OWNER`](flashy_shared::constants::SYSTEM_OWNER); the regular
//! create operation refuses it.

use flashy_shared::constants::SYSTEM_OWNER;
use flashy_shared::{validation, DeviceId};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cards::insert_card_row;
use crate::database::Database;
use crate::decks::insert_deck_row;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StarterCard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StarterDeck {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub cards: Vec<StarterCard>,
}

impl StarterDeck {
    /// Parse a JSON array of starter decks.
    pub fn parse_list(json: &str) -> serde_json::Result<Vec<StarterDeck>> {
        serde_json::from_str(json)
    }
}

impl Database {
    /// Insert every starter deck whose title is not already present.
    ///
    /// Runs in one transaction. Returns the number of decks inserted.
    pub fn seed_starter_decks(&mut self, decks: &[StarterDeck]) -> Result<usize> {
        let system = DeviceId::system();
        let tx = self.conn_mut().transaction()?;
        let mut inserted = 0;

        for starter in decks {
            let title = validation::deck_title(Some(&starter.title))?;
            if starter_exists(&tx, &title)? {
                continue;
            }

            let deck = insert_deck_row(
                &tx,
                &system,
                title,
                starter.description.as_deref(),
                starter.color.as_deref(),
            )?;
            let mut cards = 0;
            for card in &starter.cards {
                match validation::card_sides(Some(&card.front), Some(&card.back)) {
                    Ok((front, back)) => {
                        insert_card_row(&tx, deck.id, front, back)?;
                        cards += 1;
                    }
                    Err(e) => warn!(deck = %deck.title, error = %e, "skipping starter card"),
                }
            }
            info!(deck_id = %deck.id, title = %deck.title, cards, "seeded starter deck");
            inserted += 1;
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Delete the named starter decks and their cards. Returns how many decks were removed.
    pub fn remove_starter_decks(&mut self, titles: &[&str]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        let mut removed = 0;

        for title in titles {
            tx.execute(
                "DELETE FROM cards WHERE deck_id IN
                   (SELECT id FROM decks WHERE device_id = ?1 AND title = ?2)",
                params![SYSTEM_OWNER, title],
            )?;
            let affected = tx.execute(
                "DELETE FROM decks WHERE device_id = ?1 AND title = ?2",
                params![SYSTEM_OWNER, title],
            )?;
            if affected == 0 {
                warn!(title = %title, "starter deck not found");
            }
            removed += affected;
        }

        tx.commit()?;
        info!(removed, "removed starter decks");
        Ok(removed)
    }
}

fn starter_exists(conn: &Connection, title: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM decks WHERE device_id = ?1 AND title = ?2",
            params![SYSTEM_OWNER, title],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{device, test_db};
    use crate::StoreError;

    const STARTERS: &str = r##"[
        {
            "title": "French Basics",
            "description": "Everyday phrases",
            "color": "#FF6B6B",
            "cards": [
                { "front": "Hello", "back": "Bonjour" },
                { "front": "Thanks", "back": "Merci" },
                { "front": "  ", "back": "dropped" }
            ]
        },
        { "title": "Empty Starter" }
    ]"##;

    #[test]
    fn seeding_is_idempotent_and_visible_to_everyone() {
        let (mut db, _dir) = test_db();
        let decks = StarterDeck::parse_list(STARTERS).unwrap();

        assert_eq!(db.seed_starter_decks(&decks).unwrap(), 2);
        assert_eq!(db.seed_starter_decks(&decks).unwrap(), 0);

        for caller in ["device-a", "device-b"] {
            let listed = db.list_decks(&device(caller)).unwrap();
            assert_eq!(listed.len(), 2);
            assert!(listed.iter().all(|d| d.is_starter));
        }

        let french = db
            .list_decks(&device("device-a"))
            .unwrap()
            .into_iter()
            .find(|d| d.title == "French Basics")
            .unwrap();
        assert_eq!(french.card_count, 2);
        assert_eq!(french.color, "#FF6B6B");
        assert!(!french.editable_by(&device("device-a")));
    }

    #[test]
    fn remove_deletes_named_starters_with_cards() {
        let (mut db, _dir) = test_db();
        db.seed_starter_decks(&StarterDeck::parse_list(STARTERS).unwrap())
            .unwrap();
        let a = device("device-a");
        let french = db
            .list_decks(&a)
            .unwrap()
            .into_iter()
            .find(|d| d.title == "French Basics")
            .unwrap();

        assert_eq!(
            db.remove_starter_decks(&["French Basics", "Missing"]).unwrap(),
            1
        );
        assert!(matches!(db.list_cards(french.id, &a), Err(StoreError::NotFound)));
        let cards: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
            .unwrap();
        assert_eq!(cards, 0);
    }

    #[test]
    fn remove_ignores_caller_decks_with_same_title() {
        let (mut db, _dir) = test_db();
        let a = device("device-a");
        let mine = db.create_deck(&a, Some("French Basics"), None, None).unwrap();
        db.seed_starter_decks(&StarterDeck::parse_list(STARTERS).unwrap())
            .unwrap();

        db.remove_starter_decks(&["French Basics"]).unwrap();
        assert_eq!(db.get_deck(mine.id, &a).unwrap().title, "French Basics");
    }
}
