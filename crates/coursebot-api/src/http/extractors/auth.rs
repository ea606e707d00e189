//! Session token extractor.
//!
//! Accepts the token from the `Authorization` header in either form:
//! - `Authorization: <token>`
//! - `Authorization: Bearer <token>`
//!
//! Extraction fails with 401 when the header is missing, unreadable, or names
//! no live session.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::http::error::{AppError, INVALID_SESSION_MESSAGE};
use crate::state::AppState;

/// Token of an existing session, validated against the store.
pub struct SessionToken(pub String);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)
            .filter(|token| state.chat_service.store().contains(token))
            .ok_or_else(|| AppError::Unauthorized(INVALID_SESSION_MESSAGE.to_string()))?;
        Ok(SessionToken(token))
    }
}

/// Pull the raw token out of the Authorization header.
fn extract_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
