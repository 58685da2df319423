use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "linkedIn")]
    pub linked_in: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default)]
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: String,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

/// Sub-records of a resume carry a client-visible string id.
pub trait ResumeEntry {
    fn entry_id_mut(&mut self) -> &mut String;
}

macro_rules! impl_resume_entry {
    ($($ty:ty),*) => {
        $(impl ResumeEntry for $ty {
            fn entry_id_mut(&mut self) -> &mut String {
                &mut self.id
            }
        })*
    };
}

impl_resume_entry!(ExperienceEntry, EducationEntry, ProjectEntry, CertificationEntry);

/// Gives every entry without an id a fresh one; existing ids are kept so
/// edits from the builder stay stable.
pub fn assign_entry_ids<T: ResumeEntry>(entries: &mut [T]) {
    for entry in entries.iter_mut() {
        let id = entry.entry_id_mut();
        if id.trim().is_empty() {
            *id = Uuid::new_v4().to_string();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub personal_info: Option<Json<PersonalInfo>>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub skills: Json<Vec<String>>,
    pub projects: Json<Vec<ProjectEntry>>,
    pub certifications: Json<Vec<CertificationEntry>>,
    pub template: String,
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
