use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    error::AppError,
    state::AppState,
    users::repo_types::User,
};

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Extracts and validates the bearer token, yielding the user id.
/// Never touches the database.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Like [`AuthUser`] but also loads the account and requires it to be active.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization scheme"))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "token subject no longer exists");
            AppError::unauthorized(INVALID_CREDENTIALS)
        })?;

        if !user.is_active {
            warn!(user_id = %user_id, "inactive user");
            return Err(AppError::BadRequest("Inactive user".into()));
        }

        Ok(CurrentUser(user))
    }
}
