//! Deck and card records as stored and as returned over HTTP.
//!
//! Field names on the wire follow the table columns (`device_id`,
//! `created_at`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::Access;
use crate::types::DeviceId;

/// A named collection of cards owned by one identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: Uuid,
    /// Owning device, or the reserved starter-deck owner.
    #[serde(rename = "device_id")]
    pub owner_id: DeviceId,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    /// Number of cards in the deck at read time.
    pub card_count: i64,
    /// True when the deck is owned by the reserved starter-deck owner.
    pub is_starter: bool,
}

impl Deck {
    /// Whether `caller` may edit or delete this deck.
    pub fn editable_by(&self, caller: &DeviceId) -> bool {
        Access::Write.permits(&self.owner_id, caller)
    }
}

/// A front/back pair belonging to exactly one deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}
