use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User, UserChanges};

impl User {
    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, company_name,
                   industry, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Find a user by (already normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, company_name,
                   industry, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn list(db: &PgPool, skip: i64, limit: i64) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, company_name,
                   industry, is_active, is_verified, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await
    }

    /// Create a new user with a hashed password.
    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, company_name, industry)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, password_hash, company_name,
                      industry, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.company_name)
        .bind(new.industry)
        .fetch_one(db)
        .await
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &UserChanges<'_>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET first_name   = COALESCE($2, first_name),
                   last_name    = COALESCE($3, last_name),
                   email        = COALESCE($4, email),
                   company_name = CASE WHEN $5 THEN $6 ELSE company_name END,
                   industry     = CASE WHEN $7 THEN $8 ELSE industry END,
                   updated_at   = now()
             WHERE id = $1
            RETURNING id, first_name, last_name, email, password_hash, company_name,
                      industry, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.company_name.is_some())
        .bind(changes.company_name.flatten())
        .bind(changes.industry.is_some())
        .bind(changes.industry.flatten())
        .fetch_optional(db)
        .await
    }

    /// Replace the stored password hash. Accepts a pool or a transaction
    /// connection so the reset flow can run it alongside token consumption.
    pub async fn set_password_hash<'e, E>(
        ex: E,
        id: Uuid,
        password_hash: &str,
    ) -> sqlx::Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET password_hash = $2,
                   updated_at    = now()
             WHERE id = $1
            RETURNING id, first_name, last_name, email, password_hash, company_name,
                      industry, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(ex)
        .await
    }

    /// Hard delete; reset tokens and locations go with it via FK cascade.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
