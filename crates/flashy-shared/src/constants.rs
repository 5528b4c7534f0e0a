/// Header carrying the caller-asserted device identity
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Reserved owner of the read-only starter decks.
/// Never produced by a client (clients generate UUIDs).
pub const SYSTEM_OWNER: &str = "starter-decks-system";

/// Color assigned to a deck created without one
pub const DEFAULT_DECK_COLOR: &str = "#6B4EFF";

/// Client-side ceiling on card front/back length, in characters.
/// The server does not enforce it.
pub const MAX_CARD_TEXT_LEN: usize = 200;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
