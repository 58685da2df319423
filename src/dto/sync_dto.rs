use serde::{Deserialize, Serialize};

use crate::models::job::Job;
use crate::utils::validation::trim_optional_string;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncJobsPayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJobsResponse {
    pub message: String,
    pub jobs: Vec<Job>,
}
