//! Caller identity taken from the `X-Device-Id` header.
//!
//! The value is caller-asserted and never verified. Handlers receive it as
//! an explicit [`Caller`] argument; requests without it are rejected before
//! any data access.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use flashy_shared::constants::DEVICE_ID_HEADER;
use flashy_shared::DeviceId;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct Caller(pub DeviceId);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(DEVICE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(DeviceId::parse)
            .map(Caller)
            .ok_or(ApiError::MissingDeviceId)
    }
}
