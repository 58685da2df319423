use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    #[validate(range(min = 1))]
    pub job_id: i32,
    pub cover_letter: Option<String>,
    #[validate(length(max = 255))]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateApplicationStatusPayload {
    #[validate(custom(function = "crate::utils::validation::validate_application_status"))]
    pub status: String,
}
