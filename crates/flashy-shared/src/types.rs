use serde::{Deserialize, Serialize};

use crate::constants::SYSTEM_OWNER;

/// Caller identity asserted by the client through the `X-Device-Id` header.
///
/// This is scoping, not security: the value is never verified. Every store
/// operation takes one explicitly so there is no ambient session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Parse a raw header value. Blank values are treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// A fresh random identity, as a client generates on first run.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The reserved owner of starter decks.
    pub fn system() -> Self {
        Self(SYSTEM_OWNER.to_string())
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_OWNER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
