use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::company::Company;

pub const JOB_TYPES: [&str; 4] = ["full-time", "part-time", "contract", "internship"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub company_id: Option<i32>,
    pub location: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub skills: Json<Vec<String>>,
    pub requirements: Option<String>,
    pub is_active: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Job joined with its (optional) company, plus the per-user flags that are
/// only present on listings decorated for a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_applied: Option<bool>,
}

/// Column list matching [`JobCompanyRow`]; callers alias `jobs` as `j` and `companies` as `c`.
pub const JOB_WITH_COMPANY_COLUMNS: &str = "j.id, j.title, j.description, j.company_id, j.location, j.type, \
     j.salary_min, j.salary_max, j.skills, j.requirements, j.is_active, j.posted_at, j.created_at, \
     c.id AS company_ref_id, c.name AS company_name, c.description AS company_description, \
     c.website AS company_website, c.logo AS company_logo, c.location AS company_location, \
     c.created_at AS company_created_at";

#[derive(Debug, FromRow)]
pub struct JobCompanyRow {
    #[sqlx(flatten)]
    pub job: Job,
    pub company_ref_id: Option<i32>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_logo: Option<String>,
    pub company_location: Option<String>,
    pub company_created_at: Option<DateTime<Utc>>,
}

impl From<JobCompanyRow> for JobWithCompany {
    fn from(row: JobCompanyRow) -> Self {
        let company = match (row.company_ref_id, row.company_name) {
            (Some(id), Some(name)) => Some(Company {
                id,
                name,
                description: row.company_description,
                website: row.company_website,
                logo: row.company_logo,
                location: row.company_location,
                created_at: row.company_created_at,
            }),
            _ => None,
        };

        Self {
            job: row.job,
            company,
            is_saved: None,
            has_applied: None,
        }
    }
}
