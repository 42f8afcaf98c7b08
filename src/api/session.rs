use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::{error::AppError, models::UserId};

use super::AppState;

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "moovies.session-token";

/// The signed-in user behind a request
///
/// Extracting it rejects the request with `Unauthenticated` when no token is
/// present or the identity provider does not recognise it, before the handler
/// body (and so any store access) runs.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthenticated)?;

        match state.sessions.verify(&token).await? {
            Some(user_id) => Ok(Session { user_id }),
            None => {
                tracing::debug!("Session token not recognised");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

/// Bearer token if present, otherwise the session cookie
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
