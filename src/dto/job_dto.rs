use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::validation::{optional_decimal_from_str, trim_optional_string};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_salary_range"))]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub company_id: Option<i32>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = "crate::utils::validation::validate_job_type"))]
    pub job_type: String,
    #[validate(custom(function = "crate::utils::validation::validate_non_negative"))]
    pub salary_min: Option<Decimal>,
    #[validate(custom(function = "crate::utils::validation::validate_non_negative"))]
    pub salary_max: Option<Decimal>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_salary_range(payload: &CreateJobPayload) -> Result<(), ValidationError> {
    match (payload.salary_min, payload.salary_max) {
        (Some(min), Some(max)) if min > max => {
            Err(ValidationError::new("salary_min_exceeds_salary_max"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    #[serde(deserialize_with = "trim_optional_string")]
    pub location: Option<String>,
    #[serde(rename = "type", deserialize_with = "trim_optional_string")]
    pub job_type: Option<String>,
    #[serde(deserialize_with = "optional_decimal_from_str")]
    pub salary_min: Option<Decimal>,
    #[serde(deserialize_with = "trim_optional_string")]
    pub keywords: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
