use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::models::application::APPLICATION_STATUSES;
use crate::models::job::JOB_TYPES;

pub fn validate_job_type(value: &str) -> Result<(), ValidationError> {
    if JOB_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(invalid("invalid_job_type", format!(
            "type must be one of: {}",
            JOB_TYPES.join(", ")
        )))
    }
}

pub fn validate_application_status(value: &str) -> Result<(), ValidationError> {
    if APPLICATION_STATUSES.contains(&value) {
        Ok(())
    } else {
        Err(invalid("invalid_status", format!(
            "status must be one of: {}",
            APPLICATION_STATUSES.join(", ")
        )))
    }
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        Err(invalid("negative_amount", "amount must not be negative".to_string()))
    } else {
        Ok(())
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

// Trims strings and turns blank ones into None
pub fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Query strings carry decimals as text; blank means "not provided".
pub fn optional_decimal_from_str<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match trim_optional_string(deserializer)? {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{}': {}", raw, e))),
    }
}
