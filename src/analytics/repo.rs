use sqlx::PgPool;
use time::OffsetDateTime;

use crate::analytics::repo_types::AnalyticsRecord;

impl AnalyticsRecord {
    /// Records in `[since, until]` that carry an image and an analysis
    /// result, newest first.
    pub async fn list_analyzed(
        db: &PgPool,
        since: OffsetDateTime,
        until: OffsetDateTime,
        source_id: Option<&str>,
        limit: i64,
    ) -> sqlx::Result<Vec<AnalyticsRecord>> {
        sqlx::query_as::<_, AnalyticsRecord>(
            r#"
            SELECT id, timestamp, source_id, output_img_path, people_ct, vehicle_ct,
                   detections, analysis_result
            FROM timeseries_analytics
            WHERE timestamp >= $1
              AND timestamp <= $2
              AND analysis_result IS NOT NULL
              AND output_img_path IS NOT NULL
              AND ($3::text IS NULL OR source_id = $3)
            ORDER BY timestamp DESC
            LIMIT $4
            "#,
        )
        .bind(since)
        .bind(until)
        .bind(source_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }

    /// Distinct sources (cameras) that have produced images.
    pub async fn list_sources(db: &PgPool) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT source_id
            FROM timeseries_analytics
            WHERE output_img_path IS NOT NULL
            ORDER BY source_id
            "#,
        )
        .fetch_all(db)
        .await
    }
}
