//! Verified caller identity.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the `x-user-id` header carries an opaque, already-verified
//! user identity string. The extractor trusts it without further checks
//! and rejects requests that arrive without one.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

const USER_ID_HEADER: &str = "x-user-id";

/// The opaque user identity attached to every authenticated request.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CallerIdentity(id.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
