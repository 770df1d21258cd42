//! Acting-user extraction.
//!
//! Authentication happens upstream; the session layer forwards the user id
//! in `X-User-Id`. This module only parses it.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use notepad_core::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf the request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::Unauthenticated("missing user identity"))?;
        parse_user_id(raw.to_str().unwrap_or_default())
            .map(CurrentUser)
            .ok_or(ApiError::Unauthenticated("malformed user identity"))
    }
}

fn parse_user_id(value: &str) -> Option<UserId> {
    value
        .trim()
        .parse::<UserId>()
        .ok()
        .filter(|user_id| *user_id > 0)
}
