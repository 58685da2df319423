use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::job::JobWithCompany;

pub const APPLICATION_STATUSES: [&str; 5] =
    ["pending", "reviewed", "interview", "rejected", "accepted"];

/// Statuses counted as "pending" on the dashboard.
pub const PENDING_STATUSES: [&str; 2] = ["pending", "reviewed"];

pub const INTERVIEW_STATUS: &str = "interview";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i32,
    pub user_id: String,
    pub job_id: i32,
    pub status: String,
    pub cover_letter: Option<String>,
    pub resume: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobWithCompany>,
}
