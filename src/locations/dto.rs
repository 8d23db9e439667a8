use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub input_stream_url: Option<String>,
    pub output_stream_url: Option<String>,
    pub thumbnail: Option<String>,
}

/// Partial update; absent fields keep their stored value and an explicit
/// `null` clears an optional one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLocationRequest {
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub input_stream_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub output_stream_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub thumbnail: Option<Option<String>>,
}
