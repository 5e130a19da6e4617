use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Use this in any handler that requires authentication:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but a request without an Authorization header is
/// let through as anonymous. A header that is present but wrong is still
/// rejected.
pub struct MaybeAuthUser(pub Option<User>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    /// The session store could not be queried.
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided",
            ),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Unavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Token from `Authorization: Token <key>` or `Authorization: Bearer <key>`.
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    auth_str
        .strip_prefix("Token ")
        .or_else(|| auth_str.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        let token = token_from_headers(&parts.headers)?;

        let user = get_user_from_token(&pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                AuthError::Unavailable
            })?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthUser(Some(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_accepts_token_and_bearer_schemes() {
        assert_eq!(token_from_headers(&headers("Token abc123")), Ok("abc123"));
        assert_eq!(token_from_headers(&headers("Bearer abc123")), Ok("abc123"));
    }

    #[test]
    fn test_rejects_missing_or_malformed_header() {
        assert_eq!(
            token_from_headers(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        );
        assert_eq!(
            token_from_headers(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat)
        );
        assert_eq!(
            token_from_headers(&headers("Token ")),
            Err(AuthError::InvalidFormat)
        );
    }
}
