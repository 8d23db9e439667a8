use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, needs_rehash, verify_dummy, verify_password},
        repo_types::PasswordResetToken,
    },
    config::{ResetConfig, MAX_TTL_MINUTES},
    error::{AppError, AppResult},
    users::repo_types::User,
    validation::check_password_policy,
};

pub const RESET_TOKEN_LEN: usize = 32;

const BAD_CREDENTIALS: &str = "Incorrect email or password";
const BAD_RESET_TOKEN: &str = "Invalid or expired token";

/// Checks an email/password pair. Unknown email and wrong password produce
/// the same error.
pub async fn authenticate(db: &PgPool, email: &str, password: &str) -> AppResult<User> {
    let Some(user) = User::find_by_email(db, email).await? else {
        verify_dummy(password);
        warn!(email = %email, "login unknown email");
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login for inactive user");
        return Err(AppError::BadRequest("Inactive user".into()));
    }

    if needs_rehash(&user.password_hash)? {
        let hash = hash_password(password)?;
        if let Some(updated) = User::set_password_hash(db, user.id, &hash).await? {
            info!(user_id = %user.id, "password hash upgraded");
            return Ok(updated);
        }
    }

    Ok(user)
}

/// Random alphanumeric reset token drawn from the OS RNG.
pub fn generate_reset_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Hex SHA-256 of a reset token, the form stored in the database.
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issues a reset token for the account behind `email`. Returns `None` for
/// unknown emails so callers can answer identically either way.
pub async fn request_password_reset(
    db: &PgPool,
    cfg: &ResetConfig,
    email: &str,
) -> AppResult<Option<(String, User)>> {
    let Some(user) = User::find_by_email(db, email).await? else {
        info!(email = %email, "password reset requested for unknown email");
        return Ok(None);
    };

    let token = generate_reset_token();
    let ttl = Duration::minutes(cfg.ttl_minutes.clamp(1, MAX_TTL_MINUTES));
    let expires_at = OffsetDateTime::now_utc() + ttl;
    let record =
        PasswordResetToken::insert(db, user.id, &hash_reset_token(&token), expires_at).await?;

    info!(user_id = %user.id, reset_id = %record.id, "password reset token issued");
    Ok(Some((token, user)))
}

/// Redeems a reset token and sets a new password. The token must exist, be
/// unexpired and unconsumed; on success it and any other outstanding tokens of
/// the user are consumed in the same transaction.
pub async fn reset_password(db: &PgPool, token: &str, new_password: &str) -> AppResult<User> {
    if token.len() < RESET_TOKEN_LEN {
        return Err(AppError::BadRequest(BAD_RESET_TOKEN.into()));
    }
    check_password_policy(new_password)?;

    let mut tx = db.begin().await?;
    let now = OffsetDateTime::now_utc();

    let record = PasswordResetToken::find_by_hash_for_update(&mut *tx, &hash_reset_token(token))
        .await?
        .filter(|r| r.is_usable(now))
        .ok_or_else(|| {
            warn!("reset attempted with invalid, expired or used token");
            AppError::BadRequest(BAD_RESET_TOKEN.into())
        })?;

    let hash = hash_password(new_password)?;
    let user = User::set_password_hash(&mut *tx, record.user_id, &hash)
        .await?
        .ok_or_else(|| AppError::BadRequest(BAD_RESET_TOKEN.into()))?;

    PasswordResetToken::consume_all_for_user(&mut *tx, user.id, now).await?;
    tx.commit().await?;

    info!(user_id = %user.id, reset_id = %record.id, "password reset completed");
    Ok(user)
}

/// Changes the password of an authenticated user after re-checking the
/// current one.
pub async fn change_password(
    db: &PgPool,
    user: &User,
    current_password: &str,
    new_password: &str,
) -> AppResult<User> {
    if !verify_password(current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with wrong current password");
        return Err(AppError::BadRequest("Current password is incorrect".into()));
    }
    check_password_policy(new_password)?;

    let hash = hash_password(new_password)?;
    let updated = User::set_password_hash(db, user.id, &hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(user_id = %updated.id, "password changed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_tokens_are_long_random_alphanumerics() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn reset_token_hash_is_stable_hex_sha256() {
        let h = hash_reset_token("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(h, hash_reset_token("abc"));
        assert_ne!(h, hash_reset_token("abd"));
    }
}
