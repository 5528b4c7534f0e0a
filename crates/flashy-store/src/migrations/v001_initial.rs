//! v001 -- Initial schema: `decks` and `cards`.

use rusqlite::Connection;

const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Decks
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS decks (
    id          TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    device_id   TEXT NOT NULL,                -- owner, or 'starter-decks-system'
    title       TEXT NOT NULL,
    description TEXT,
    color       TEXT NOT NULL,
    created_at  TEXT NOT NULL                 -- RFC-3339, microsecond precision
);

CREATE INDEX IF NOT EXISTS idx_decks_device_created
    ON decks(device_id, created_at DESC);

-- ----------------------------------------------------------------
-- Cards
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cards (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    deck_id    TEXT NOT NULL,                 -- FK -> decks(id)
    front      TEXT NOT NULL,
    back       TEXT NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (deck_id) REFERENCES decks(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_cards_deck_created
    ON cards(deck_id, created_at ASC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
