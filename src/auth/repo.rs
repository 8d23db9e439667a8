use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::PasswordResetToken;

impl PasswordResetToken {
    pub async fn insert<'e, E>(
        ex: E,
        user_id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<PasswordResetToken>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, PasswordResetToken>(
            r#"
            INSERT INTO password_resets (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, used_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(ex)
        .await
    }

    /// Looks up a token by hash and row-locks it for the rest of the
    /// transaction, so two concurrent resets cannot both redeem it.
    pub async fn find_by_hash_for_update<'e, E>(
        ex: E,
        token_hash: &str,
    ) -> sqlx::Result<Option<PasswordResetToken>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, user_id, token_hash, expires_at, used_at, created_at
            FROM password_resets
            WHERE token_hash = $1
            FOR UPDATE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(ex)
        .await
    }

    /// Marks every outstanding token of the user as consumed.
    pub async fn consume_all_for_user<'e, E>(
        ex: E,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> sqlx::Result<u64>
    where
        E: PgExecutor<'e>,
    {
        let res = sqlx::query(
            r#"
            UPDATE password_resets
               SET used_at = $2
             WHERE user_id = $1 AND used_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(ex)
        .await?;
        Ok(res.rows_affected())
    }
}
