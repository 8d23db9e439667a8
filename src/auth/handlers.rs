use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, DetailResponse, ForgotPasswordRequest, LoginForm,
            LoginRequest, ResetPasswordRequest, TokenResponse,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        services,
    },
    error::AppResult,
    mailer::reset_url,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UserResponse},
        services as user_services,
    },
    validation::{normalize_email, require_email},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/login/form", post(login_form))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/change-password", post(change_password))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = user_services::create_user(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = require_email(&payload.email)?;
    issue_token(&state, &email, &payload.password).await
}

/// Form-encoded login for OAuth2 password-grant clients.
#[instrument(skip(state, form))]
pub async fn login_form(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&form.username);
    issue_token(&state, &email, &form.password).await
}

async fn issue_token(state: &AppState, email: &str, password: &str) -> AppResult<Json<TokenResponse>> {
    let user = services::authenticate(&state.db, email, password).await?;

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse::bearer(token, keys.ttl_secs())))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<(StatusCode, Json<DetailResponse>)> {
    let email = require_email(&payload.email)?;

    if let Some((token, user)) =
        services::request_password_reset(&state.db, &state.config.reset, &email).await?
    {
        let mailer = state.mailer.clone();
        let url = reset_url(&state.config.reset.frontend_url, &token);
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&user.email, &url).await {
                error!(error = %e, user_id = %user.id, "password reset delivery failed");
            }
        });
    }

    // Same answer whether or not the account exists.
    Ok((
        StatusCode::ACCEPTED,
        Json(DetailResponse::new(
            "If your email is registered, you will receive a password reset link.",
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<DetailResponse>> {
    services::reset_password(&state.db, payload.token.trim(), &payload.new_password).await?;
    Ok(Json(DetailResponse::new("Password has been reset successfully.")))
}

#[instrument(skip(state, user, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = services::change_password(
        &state.db,
        &user,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(updated.into()))
}

#[instrument(skip(user))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_is_bearer() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into(), 1800)).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 1800);
    }
}
