use flashy_shared::ValidationError;
use thiserror::Error;

use crate::review::ReviewError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine application config directory")]
    NoDataDir,
}

impl ClientError {
    /// True for the uniform "does not exist or not yours" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
