use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Provenance record linking an ingested job to the feed it came from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExternalJobSource {
    pub id: i32,
    pub source: String,
    pub external_id: String,
    pub job_id: Option<i32>,
    pub last_synced: Option<DateTime<Utc>>,
    pub data: Option<JsonValue>,
}
