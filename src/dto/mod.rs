pub mod application_dto;
pub mod company_dto;
pub mod dashboard_dto;
pub mod job_alert_dto;
pub mod job_dto;
pub mod resume_dto;
pub mod saved_job_dto;
pub mod sync_dto;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
