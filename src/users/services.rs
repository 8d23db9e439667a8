use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::password::hash_password,
    error::{AppError, AppResult},
    patch,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest},
        repo_types::{NewUser, User, UserChanges},
    },
    validation::{check_len, check_optional_len, check_password_policy, require_email},
};

const NAME_MAX: usize = 100;
const ORG_MAX: usize = 255;

pub async fn get_user(db: &PgPool, id: Uuid) -> AppResult<User> {
    User::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Validates the request, rejects a taken email and stores the user with a
/// hashed password.
pub async fn create_user(db: &PgPool, req: &CreateUserRequest) -> AppResult<User> {
    let email = require_email(&req.email)?;
    check_len("first_name", req.first_name.trim(), 1, NAME_MAX)?;
    check_len("last_name", req.last_name.trim(), 1, NAME_MAX)?;
    check_optional_len("company_name", req.company_name.as_deref(), ORG_MAX)?;
    check_optional_len("industry", req.industry.as_deref(), ORG_MAX)?;
    check_password_policy(&req.password)?;

    if User::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(
        db,
        &NewUser {
            first_name: req.first_name.trim(),
            last_name: req.last_name.trim(),
            email: &email,
            password_hash: &hash,
            company_name: req.company_name.as_deref(),
            industry: req.industry.as_deref(),
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn update_user(db: &PgPool, id: Uuid, req: &UpdateUserRequest) -> AppResult<User> {
    let current = get_user(db, id).await?;

    let first_name = req.first_name.as_deref().map(str::trim);
    let last_name = req.last_name.as_deref().map(str::trim);
    if let Some(v) = first_name {
        check_len("first_name", v, 1, NAME_MAX)?;
    }
    if let Some(v) = last_name {
        check_len("last_name", v, 1, NAME_MAX)?;
    }
    let company_name = patch::as_deref(&req.company_name);
    let industry = patch::as_deref(&req.industry);
    check_optional_len("company_name", company_name.flatten(), ORG_MAX)?;
    check_optional_len("industry", industry.flatten(), ORG_MAX)?;

    let email = match req.email.as_deref() {
        Some(raw) => {
            let email = require_email(raw)?;
            if email != current.email {
                if let Some(other) = User::find_by_email(db, &email).await? {
                    warn!(user_id = %id, other_id = %other.id, "email already in use");
                    return Err(AppError::Conflict("Email already in use".into()));
                }
            }
            Some(email)
        }
        None => None,
    };

    let changes = UserChanges {
        first_name,
        last_name,
        email: email.as_deref(),
        company_name,
        industry,
    };

    let user = User::update_profile(db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(user_id = %user.id, "user profile updated");
    Ok(user)
}

pub async fn delete_user(db: &PgPool, id: Uuid) -> AppResult<()> {
    if !User::delete(db, id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}

