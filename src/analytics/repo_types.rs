use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `timeseries_analytics` log written by the detection pipeline.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalyticsRecord {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub source_id: String,
    pub output_img_path: Option<String>,
    pub people_ct: i32,
    pub vehicle_ct: i32,
    pub detections: Option<serde_json::Value>,
    pub analysis_result: Option<String>,
}
