//! # flashy-store
//!
//! SQLite storage for Flashy decks and cards.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`. Every deck-scoped operation takes the caller's
//! [`DeviceId`](flashy_shared::DeviceId) and filters by the access policy in
//! the query itself, so a deck the caller may not see is reported as
//! [`StoreError::NotFound`], exactly like a deck that does not exist.

pub mod cards;
pub mod database;
pub mod decks;
pub mod migrations;
pub mod starter;

mod access;
mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use flashy_shared::models::{Card, Deck};
pub use starter::{StarterCard, StarterDeck};
