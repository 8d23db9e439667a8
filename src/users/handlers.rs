use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{services::change_password, CurrentUser},
    error::{AppError, AppResult},
    state::AppState,
    users::{
        dto::{CreateUserRequest, Pagination, UpdatePasswordRequest, UpdateUserRequest, UserResponse},
        repo_types::User,
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/password", put(update_password))
}

/// Accounts may only be modified by their owner.
fn ensure_self(caller: Uuid, target: Uuid) -> AppResult<()> {
    if caller != target {
        warn!(%caller, %target, "attempt to modify another user's account");
        return Err(AppError::Forbidden(
            "You don't have permission to modify this user".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = services::create_user(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let (skip, limit) = p.bounds();
    let users = User::list(&state.db, skip, limit).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = services::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    ensure_self(caller.id, id)?;
    let user = services::update_user(&state.db, id, &payload).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, user, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<Json<UserResponse>> {
    ensure_self(user.id, id)?;
    let updated = change_password(
        &state.db,
        &user,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(updated.into()))
}

#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ensure_self(caller.id, id)?;
    services::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
