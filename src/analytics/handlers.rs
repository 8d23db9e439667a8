use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument};

use crate::{
    analytics::{
        dto::{SourcesResponse, TrafficAnalysisQuery},
        repo_types::AnalyticsRecord,
    },
    auth::CurrentUser,
    error::AppResult,
    state::AppState,
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/traffic-analysis", get(traffic_analysis))
        .route("/analytics/traffic-sources", get(traffic_sources))
}

#[instrument(skip(state, _user))]
pub async fn traffic_analysis(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(q): Query<TrafficAnalysisQuery>,
) -> AppResult<Json<Vec<AnalyticsRecord>>> {
    let until = OffsetDateTime::now_utc();
    let since = until - Duration::hours(q.hours());
    let records =
        AnalyticsRecord::list_analyzed(&state.db, since, until, q.source(), q.limit()).await?;
    debug!(count = records.len(), "traffic analysis records loaded");
    Ok(Json(records))
}

#[instrument(skip(state, _user))]
pub async fn traffic_sources(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> AppResult<Json<SourcesResponse>> {
    let sources = AnalyticsRecord::list_sources(&state.db).await?;
    Ok(Json(SourcesResponse { sources }))
}
