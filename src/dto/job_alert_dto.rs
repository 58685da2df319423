use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::trim_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobAlertPayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(max = 255))]
    pub keywords: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "trim_optional_string")]
    #[validate(custom(function = "crate::utils::validation::validate_job_type"))]
    pub job_type: Option<String>,
    #[validate(custom(function = "crate::utils::validation::validate_non_negative"))]
    pub salary_min: Option<Decimal>,
    pub is_active: Option<bool>,
}
