//! Deck access policy.
//!
//! Two classes of deck are visible to a caller: its own decks and the
//! starter decks owned by [`SYSTEM_OWNER`](crate::constants::SYSTEM_OWNER).
//! Only the former are writable, and the reserved owner is never writable,
//! not even by a caller that asserts it. The store evaluates the same rules
//! as SQL predicates; this is the in-memory form.

use crate::types::DeviceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    /// Whether `caller` may perform this kind of access on a deck owned by `owner`.
    pub fn permits(self, owner: &DeviceId, caller: &DeviceId) -> bool {
        match self {
            Access::Read => owner == caller || owner.is_system(),
            Access::Write => owner == caller && !owner.is_system(),
        }
    }
}
