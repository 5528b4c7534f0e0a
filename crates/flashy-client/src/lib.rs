//! # flashy-client
//!
//! Client side of Flashy: the persisted device identity attached to every
//! request, a typed HTTP client for the deck/card API, and the in-memory
//! review session that sequences a shuffled deck through flip and grade
//! steps.

pub mod api;
pub mod config;
pub mod device;
pub mod review;

mod error;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use device::DeviceIdentity;
pub use error::{ClientError, Result};
pub use review::{Grade, Phase, ReviewError, ReviewKey, ReviewPacer, ReviewSession};
