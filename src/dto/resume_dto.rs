use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry,
};

pub const DEFAULT_TEMPLATE: &str = "modern";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumePayload {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<CertificationEntry>,
    #[validate(length(min = 1, max = 50))]
    pub template: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResumePayload {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub certifications: Option<Vec<CertificationEntry>>,
    #[validate(length(min = 1, max = 50))]
    pub template: Option<String>,
    pub is_default: Option<bool>,
}
