use serde::{Deserialize, Serialize};

const MAX_HOURS: i64 = 24 * 30;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct TrafficAnalysisQuery {
    pub source_id: Option<String>,
    #[serde(default = "default_hours_ago")]
    pub hours_ago: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_hours_ago() -> i64 {
    24
}

fn default_limit() -> i64 {
    10
}

impl TrafficAnalysisQuery {
    pub fn hours(&self) -> i64 {
        self.hours_ago.clamp(1, MAX_HOURS)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Empty `source_id` means no filter.
    pub fn source(&self) -> Option<&str> {
        self.source_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let q: TrafficAnalysisQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.hours(), q.limit(), q.source()), (24, 10, None));

        let q: TrafficAnalysisQuery = serde_json::from_str(
            r#"{"source_id": "  ", "hours_ago": 100000, "limit": -3}"#,
        )
        .unwrap();
        assert_eq!((q.hours(), q.limit(), q.source()), (720, 1, None));

        let q: TrafficAnalysisQuery =
            serde_json::from_str(r#"{"source_id": "cam-7"}"#).unwrap();
        assert_eq!(q.source(), Some("cam-7"));
    }
}
