use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use linkpulse_core::Owner;

use crate::error::AppError;

/// Header carrying the authenticated principal. Authentication itself
/// happens upstream of this service.
pub const OWNER_HEADER: &str = "x-owner-id";

/// The owner of the current request, taken from [`OWNER_HEADER`].
///
/// Rejects with 401 when the header is absent, blank or not valid UTF-8.
#[derive(Debug, Clone)]
pub struct OwnerId(pub Owner);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::MissingOwner)?;

        Owner::new(value.trim())
            .map(OwnerId)
            .map_err(|_| AppError::MissingOwner)
    }
}
