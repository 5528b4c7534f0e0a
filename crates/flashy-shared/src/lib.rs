//! # flashy-shared
//!
//! Types shared by the Flashy server, store and client: the caller identity,
//! the reserved starter-deck owner, field validation and the JSON bodies
//! exchanged over HTTP.

pub mod access;
pub mod constants;
pub mod error;
pub mod models;
pub mod protocol;
pub mod types;
pub mod validation;

pub use access::Access;
pub use error::ValidationError;
pub use models::{Card, Deck};
pub use types::DeviceId;
