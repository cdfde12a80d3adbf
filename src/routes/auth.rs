use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Bearer token taken from the `Authorization` header
///
/// A missing header rejects with `MissingAuthorization`; a header that is not
/// `Bearer <token>` rejects with `InvalidToken` without calling the authority.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::MissingAuthorization)?;

        let value = header.to_str().map_err(|_| {
            tracing::warn!("Authorization header is not valid UTF-8");
            AppError::InvalidToken
        })?;

        parse_bearer(value).map(BearerToken).ok_or_else(|| {
            tracing::warn!("Malformed authorization header");
            AppError::InvalidToken
        })
    }
}

/// Extract the token from `Bearer <token>` (scheme is case-insensitive)
pub fn parse_bearer(value: &str) -> Option<String> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
