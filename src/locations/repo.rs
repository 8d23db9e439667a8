use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    locations::{
        dto::{CreateLocationRequest, UpdateLocationRequest},
        repo_types::Location,
    },
    patch,
};

impl Location {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateLocationRequest,
    ) -> sqlx::Result<Location> {
        sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (user_id, address, latitude, longitude, description, tags,
                                   input_stream_url, output_stream_url, thumbnail)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, address, latitude, longitude, description, tags,
                      input_stream_url, output_stream_url, thumbnail, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(req.address.trim())
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(req.description.as_deref())
        .bind(req.tags.as_deref())
        .bind(req.input_stream_url.as_deref())
        .bind(req.output_stream_url.as_deref())
        .bind(req.thumbnail.as_deref())
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Location>> {
        sqlx::query_as::<_, Location>(
            r#"
            SELECT id, user_id, address, latitude, longitude, description, tags,
                   input_stream_url, output_stream_url, thumbnail, created_at, updated_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> sqlx::Result<Vec<Location>> {
        sqlx::query_as::<_, Location>(
            r#"
            SELECT id, user_id, address, latitude, longitude, description, tags,
                   input_stream_url, output_stream_url, thumbnail, created_at, updated_at
            FROM locations
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        req: &UpdateLocationRequest,
    ) -> sqlx::Result<Option<Location>> {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
               SET address           = COALESCE($2, address),
                   latitude          = COALESCE($3, latitude),
                   longitude         = COALESCE($4, longitude),
                   description       = CASE WHEN $5 THEN $6 ELSE description END,
                   tags              = CASE WHEN $7 THEN $8 ELSE tags END,
                   input_stream_url  = CASE WHEN $9 THEN $10 ELSE input_stream_url END,
                   output_stream_url = CASE WHEN $11 THEN $12 ELSE output_stream_url END,
                   thumbnail         = CASE WHEN $13 THEN $14 ELSE thumbnail END,
                   updated_at        = now()
             WHERE id = $1
            RETURNING id, user_id, address, latitude, longitude, description, tags,
                      input_stream_url, output_stream_url, thumbnail, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.address.as_deref().map(str::trim))
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(req.description.is_some())
        .bind(patch::as_deref(&req.description).flatten())
        .bind(req.tags.is_some())
        .bind(req.tags.as_ref().and_then(|t| t.as_deref()))
        .bind(req.input_stream_url.is_some())
        .bind(patch::as_deref(&req.input_stream_url).flatten())
        .bind(req.output_stream_url.is_some())
        .bind(patch::as_deref(&req.output_stream_url).flatten())
        .bind(req.thumbnail.is_some())
        .bind(patch::as_deref(&req.thumbnail).flatten())
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
