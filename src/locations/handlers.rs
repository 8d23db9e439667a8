use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{AppError, AppResult},
    locations::{
        dto::{CreateLocationRequest, UpdateLocationRequest},
        repo_types::Location,
    },
    patch,
    state::AppState,
    users::dto::Pagination,
    validation::{check_len, check_optional_len},
};

const ADDRESS_MAX: usize = 255;
const URL_MAX: usize = 255;

pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/me", get(my_locations))
        .route("/locations/user/:user_id", get(user_locations))
        .route(
            "/locations/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
}

fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<()> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::validation("latitude must be between -90 and 90"));
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::validation("longitude must be between -180 and 180"));
        }
    }
    Ok(())
}

fn check_urls(
    input_stream_url: Option<&str>,
    output_stream_url: Option<&str>,
    thumbnail: Option<&str>,
) -> AppResult<()> {
    check_optional_len("input_stream_url", input_stream_url, URL_MAX)?;
    check_optional_len("output_stream_url", output_stream_url, URL_MAX)?;
    check_optional_len("thumbnail", thumbnail, URL_MAX)
}

fn validate_create(req: &CreateLocationRequest) -> AppResult<()> {
    check_len("address", req.address.trim(), 1, ADDRESS_MAX)?;
    check_coordinates(Some(req.latitude), Some(req.longitude))?;
    check_urls(
        req.input_stream_url.as_deref(),
        req.output_stream_url.as_deref(),
        req.thumbnail.as_deref(),
    )
}

fn validate_update(req: &UpdateLocationRequest) -> AppResult<()> {
    if let Some(address) = req.address.as_deref() {
        check_len("address", address.trim(), 1, ADDRESS_MAX)?;
    }
    check_coordinates(req.latitude, req.longitude)?;
    check_urls(
        patch::as_deref(&req.input_stream_url).flatten(),
        patch::as_deref(&req.output_stream_url).flatten(),
        patch::as_deref(&req.thumbnail).flatten(),
    )
}

/// Loads a location and requires `user_id` to own it.
async fn owned_location(db: &PgPool, id: Uuid, user_id: Uuid) -> AppResult<Location> {
    let location = Location::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Location not found".into()))?;
    if location.user_id != user_id {
        warn!(location_id = %id, %user_id, owner = %location.user_id, "location access denied");
        return Err(AppError::Forbidden(
            "You don't have permission to access this location".into(),
        ));
    }
    Ok(location)
}

#[instrument(skip(state, user, payload))]
pub async fn create_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateLocationRequest>,
) -> AppResult<(StatusCode, Json<Location>)> {
    validate_create(&payload)?;
    let location = Location::create(&state.db, user.id, &payload).await?;
    info!(location_id = %location.id, user_id = %user.id, "location created");
    Ok((StatusCode::CREATED, Json(location)))
}

#[instrument(skip(state, user))]
pub async fn list_locations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Location>>> {
    let (skip, limit) = p.bounds();
    Ok(Json(Location::list_by_user(&state.db, user.id, skip, limit).await?))
}

#[instrument(skip(state, user))]
pub async fn my_locations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Location>>> {
    let (skip, limit) = Pagination::default().bounds();
    Ok(Json(Location::list_by_user(&state.db, user.id, skip, limit).await?))
}

#[instrument(skip(state, caller))]
pub async fn user_locations(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Location>>> {
    if caller.id != user_id {
        warn!(caller = %caller.id, %user_id, "listing another user's locations denied");
        return Err(AppError::Forbidden(
            "You don't have permission to access locations for this user".into(),
        ));
    }
    let (skip, limit) = p.bounds();
    Ok(Json(Location::list_by_user(&state.db, user_id, skip, limit).await?))
}

#[instrument(skip(state, user))]
pub async fn get_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Location>> {
    Ok(Json(owned_location(&state.db, id, user.id).await?))
}

#[instrument(skip(state, user, payload))]
pub async fn update_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> AppResult<Json<Location>> {
    validate_update(&payload)?;
    owned_location(&state.db, id, user.id).await?;
    let location = Location::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Location not found".into()))?;
    info!(location_id = %id, user_id = %user.id, "location updated");
    Ok(Json(location))
}

#[instrument(skip(state, user))]
pub async fn delete_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    owned_location(&state.db, id, user.id).await?;
    if !Location::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Location not found".into()));
    }
    info!(location_id = %id, user_id = %user.id, "location deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(lat: f64, lon: f64, address: &str) -> CreateLocationRequest {
        CreateLocationRequest {
            address: address.into(),
            latitude: lat,
            longitude: lon,
            description: None,
            tags: Some(vec!["intersection".into()]),
            input_stream_url: None,
            output_stream_url: None,
            thumbnail: None,
        }
    }

    #[test]
    fn valid_location_passes() {
        assert!(validate_create(&create_req(40.7128, -74.006, "Broadway & 42nd")).is_ok());
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        assert!(validate_create(&create_req(91.0, 0.0, "x")).is_err());
        assert!(validate_create(&create_req(0.0, -180.5, "x")).is_err());
    }

    #[test]
    fn blank_address_is_rejected() {
        let err = validate_create(&create_req(0.0, 0.0, "   ")).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        assert!(validate_update(&UpdateLocationRequest::default()).is_ok());
        let req = UpdateLocationRequest {
            latitude: Some(-100.0),
            ..Default::default()
        };
        assert!(validate_update(&req).is_err());
    }
}
