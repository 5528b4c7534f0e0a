//! SQL form of the deck access policy.
//!
//! The fragments are written against the `decks` table without an alias;
//! `device_id` only exists on `decks`, so they stay unambiguous in joins.
//! Both bind `:caller` and `:system`.

use flashy_shared::constants::SYSTEM_OWNER;
use flashy_shared::{Access, DeviceId};
use rusqlite::{named_params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};

pub(crate) fn deck_filter(access: Access) -> &'static str {
    match access {
        Access::Read => "(device_id = :caller OR device_id = :system)",
        Access::Write => "(device_id = :caller AND device_id <> :system)",
    }
}

/// Whether `deck_id` exists and satisfies `access` for `caller`.
pub(crate) fn deck_permits(
    conn: &Connection,
    deck_id: Uuid,
    caller: &DeviceId,
    access: Access,
) -> Result<bool> {
    let sql = format!(
        "SELECT 1 FROM decks WHERE id = :id AND {}",
        deck_filter(access)
    );
    let found = conn
        .query_row(
            &sql,
            named_params! {
                ":id": deck_id.to_string(),
                ":caller": caller.as_str(),
                ":system": SYSTEM_OWNER,
            },
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// Fail with [`StoreError::NotFound`] unless `caller` has `access` to the deck.
    pub(crate) fn require_deck(&self, deck_id: Uuid, caller: &DeviceId, access: Access) -> Result<()> {
        if deck_permits(self.conn(), deck_id, caller, access)? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
