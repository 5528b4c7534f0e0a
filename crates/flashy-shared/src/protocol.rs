//! JSON bodies of the HTTP API.
//!
//! Request fields are optional at the serde level so that a missing field is
//! reported as a validation error with a stable message rather than a
//! deserialization failure.

use serde::{Deserialize, Serialize};

use crate::models::{Card, Deck};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDeckRequest {
    pub title: Option<String>,
    /// Omitting the description clears it.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecksResponse {
    pub decks: Vec<Deck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckResponse {
    pub deck: Deck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsResponse {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResponse {
    pub card: Card,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
