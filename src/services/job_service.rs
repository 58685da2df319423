use std::collections::HashSet;

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::dto::job_dto::{CreateJobPayload, JobListQuery};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobCompanyRow, JobWithCompany, JOB_WITH_COMPANY_COLUMNS};

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const DEFAULT_USER_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

const ALL_LOCATIONS: &str = "All Locations";
const ALL_TYPES: &str = "all";

pub(crate) const JOB_COLUMNS: &str = "id, title, description, company_id, location, type, salary_min, salary_max, skills, requirements, is_active, posted_at, created_at";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    Text(String),
    Amount(Decimal),
}

/// Normalised job listing filter. Sentinel values from the UI ("All Locations",
/// "all") and blank strings have already been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub keywords: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl JobFilter {
    pub fn from_query(query: JobListQuery, default_limit: i64) -> Self {
        let location = query
            .location
            .filter(|loc| !loc.trim().is_empty() && loc != ALL_LOCATIONS);
        let job_type = query
            .job_type
            .filter(|t| !t.trim().is_empty() && t != ALL_TYPES);
        let salary_min = query.salary_min.filter(|amount| !amount.is_zero());
        let keywords = query.keywords.filter(|k| !k.trim().is_empty());

        Self {
            location,
            job_type,
            salary_min,
            keywords,
            limit: query.limit.unwrap_or(default_limit).clamp(1, MAX_LIST_LIMIT),
            offset: query.offset.unwrap_or(0).max(0),
        }
    }

    /// Builds the WHERE clause and its positional arguments.
    /// Every predicate is ANDed with the active flag.
    pub fn where_clause(&self) -> (String, Vec<FilterArg>) {
        let mut filters = vec!["j.is_active = TRUE".to_string()];
        let mut args: Vec<FilterArg> = Vec::new();

        if let Some(location) = &self.location {
            args.push(FilterArg::Text(contains_pattern(location)));
            filters.push(format!("j.location ILIKE ${}", args.len()));
        }
        if let Some(job_type) = &self.job_type {
            args.push(FilterArg::Text(job_type.clone()));
            filters.push(format!("j.type = ${}", args.len()));
        }
        if let Some(salary_min) = self.salary_min {
            args.push(FilterArg::Amount(salary_min));
            filters.push(format!("j.salary_min >= ${}", args.len()));
        }
        if let Some(keywords) = &self.keywords {
            args.push(FilterArg::Text(contains_pattern(keywords)));
            let n = args.len();
            filters.push(format!("(j.title ILIKE ${n} OR j.description ILIKE ${n})"));
        }

        (filters.join(" AND "), args)
    }

    pub fn to_sql(&self) -> (String, Vec<FilterArg>) {
        let (where_clause, args) = self.where_clause();
        let sql = format!(
            "SELECT {}
             FROM jobs j
             LEFT JOIN companies c ON c.id = j.company_id
             WHERE {}
             ORDER BY j.posted_at DESC NULLS LAST, j.id DESC
             LIMIT ${} OFFSET ${}",
            JOB_WITH_COMPANY_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        (sql, args)
    }
}

/// `%value%` with LIKE wildcards in the user input escaped.
pub fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Annotates each job with the caller's saved/applied flags by set membership.
pub fn decorate_jobs(
    jobs: Vec<JobWithCompany>,
    saved_job_ids: &HashSet<i32>,
    applied_job_ids: &HashSet<i32>,
) -> Vec<JobWithCompany> {
    jobs.into_iter()
        .map(|mut job| {
            job.is_saved = Some(saved_job_ids.contains(&job.job.id));
            job.has_applied = Some(applied_job_ids.contains(&job.job.id));
            job
        })
        .collect()
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let sql = format!(
            r#"
            INSERT INTO jobs (
                title, description, company_id, location, type,
                salary_min, salary_max, skills, requirements, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.company_id)
            .bind(&payload.location)
            .bind(&payload.job_type)
            .bind(payload.salary_min)
            .bind(payload.salary_max)
            .bind(Json(&payload.skills))
            .bind(&payload.requirements)
            .bind(payload.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = job.id, title = %job.title, "Job created");
        Ok(job)
    }

    pub async fn list(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>> {
        let (sql, args) = filter.to_sql();

        let mut statement = sqlx::query_as::<_, JobCompanyRow>(&sql);
        for value in args {
            statement = match value {
                FilterArg::Text(text) => statement.bind(text),
                FilterArg::Amount(amount) => statement.bind(amount),
            };
        }
        statement = statement.bind(filter.limit).bind(filter.offset);

        let rows = statement.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(error = ?e, ?filter, "Failed to list jobs");
            Error::from(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Filtered listing decorated with the caller's saved/applied flags.
    pub async fn list_for_user(&self, user_id: &str, query: JobListQuery) -> Result<Vec<JobWithCompany>> {
        let filter = JobFilter::from_query(query, DEFAULT_USER_LIST_LIMIT);
        let jobs = self.list(&filter).await?;

        let saved: HashSet<i32> =
            sqlx::query_scalar::<_, i32>("SELECT job_id FROM saved_jobs WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();
        let applied: HashSet<i32> =
            sqlx::query_scalar::<_, i32>("SELECT job_id FROM applications WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();

        Ok(decorate_jobs(jobs, &saved, &applied))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<JobWithCompany> {
        let sql = format!(
            "SELECT {} FROM jobs j LEFT JOIN companies c ON c.id = j.company_id WHERE j.id = $1",
            JOB_WITH_COMPANY_COLUMNS
        );
        let row = sqlx::query_as::<_, JobCompanyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        Ok(row.into())
    }

    pub async fn list_by_ids(&self, ids: &[i32]) -> Result<Vec<JobWithCompany>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM jobs j LEFT JOIN companies c ON c.id = j.company_id WHERE j.id = ANY($1)",
            JOB_WITH_COMPANY_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobCompanyRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
