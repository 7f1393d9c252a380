//! Request-scoped authentication.
//!
//! Every route extracts a [`Principal`]: the bearer token is resolved to a
//! session in Redis and the session to a profile document. There is no
//! ambient auth context; handlers only ever see the principal they were
//! given.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use redis::AsyncCommands;

use crate::{
    database::{get_doc, session_key, user_key},
    error::AppError,
    models::User,
    state::AppState,
};

/// The authenticated caller for one request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
}

impl Principal {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let mut conn = state.redis.clone();
        let user_id: Option<String> = conn.get(session_key(token)).await?;
        let user_id = user_id.ok_or(AppError::Unauthorized)?;

        // The session can outlive the user document; treat that as no session.
        get_doc::<User>(&mut conn, &user_key(&user_id))
            .await?
            .map(|user| Principal { user })
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }
}
