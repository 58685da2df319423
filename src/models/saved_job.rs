use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: i32,
    pub user_id: String,
    pub job_id: i32,
    pub saved_at: Option<DateTime<Utc>>,
}
