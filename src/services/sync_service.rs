use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dto::company_dto::CreateCompanyPayload;
use crate::dto::sync_dto::SyncJobsPayload;
use crate::error::Result;
use crate::models::external_job_source::ExternalJobSource;
use crate::models::job::Job;
use crate::services::company_service::CompanyService;
use crate::services::job_service::JOB_COLUMNS;
use crate::utils::time::now;

pub const SOURCE_TAG: &str = "stepstone";
pub const PARTNER_COMPANY_NAME: &str = "Stepstone Partner Company";

/// A job posting as delivered by an external feed, before ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPosting {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub requirements: Option<String>,
}

impl ExternalPosting {
    /// Case-insensitive substring match over title or description. No keywords matches everything.
    pub fn matches_keywords(&self, keywords: Option<&str>) -> bool {
        match keywords.map(str::trim).filter(|k| !k.is_empty()) {
            None => true,
            Some(keywords) => {
                let needle = keywords.to_lowercase();
                self.title.to_lowercase().contains(&needle)
                    || self.description.to_lowercase().contains(&needle)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub location: Option<String>,
    pub keywords: Option<String>,
}

impl From<SyncJobsPayload> for FeedQuery {
    fn from(value: SyncJobsPayload) -> Self {
        Self {
            location: value.location,
            keywords: value.keywords,
        }
    }
}

/// Source of external postings. Ingestion and provenance do not depend on
/// which implementation is plugged in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobFeedProvider: Send + Sync {
    async fn fetch(&self, query: FeedQuery) -> Result<Vec<ExternalPosting>>;
}

/// Canned Stepstone-like feed used when no real feed is configured.
pub struct MockStepstoneProvider;

impl MockStepstoneProvider {
    pub fn postings(location: Option<&str>) -> Vec<ExternalPosting> {
        let at = |fallback: &str| Some(location.unwrap_or(fallback).to_string());
        vec![
            ExternalPosting {
                title: "Senior Software Engineer".into(),
                description: "Join our growing team as a Senior Software Engineer. We're looking for someone with 5+ years of experience in full-stack development.".into(),
                location: at("Remote"),
                job_type: "full-time".into(),
                salary_min: Some(Decimal::new(80000, 0)),
                salary_max: Some(Decimal::new(120000, 0)),
                skills: vec!["React".into(), "Node.js".into(), "TypeScript".into(), "PostgreSQL".into()],
                requirements: Some("5+ years of experience in software development".into()),
            },
            ExternalPosting {
                title: "Product Manager".into(),
                description: "Lead product development and strategy for our innovative platform. Experience with agile methodologies required.".into(),
                location: at("Berlin, Germany"),
                job_type: "full-time".into(),
                salary_min: Some(Decimal::new(70000, 0)),
                salary_max: Some(Decimal::new(95000, 0)),
                skills: vec!["Product Management".into(), "Agile".into(), "Analytics".into(), "UX Design".into()],
                requirements: Some("3+ years of product management experience".into()),
            },
            ExternalPosting {
                title: "UX Designer".into(),
                description: "Create beautiful and intuitive user experiences. Work closely with development and product teams.".into(),
                location: at("Munich, Germany"),
                job_type: "full-time".into(),
                salary_min: Some(Decimal::new(60000, 0)),
                salary_max: Some(Decimal::new(85000, 0)),
                skills: vec!["Figma".into(), "Adobe Creative Suite".into(), "User Research".into(), "Prototyping".into()],
                requirements: Some("2+ years of UX design experience".into()),
            },
        ]
    }
}

#[async_trait]
impl JobFeedProvider for MockStepstoneProvider {
    async fn fetch(&self, query: FeedQuery) -> Result<Vec<ExternalPosting>> {
        Ok(Self::postings(query.location.as_deref()))
    }
}

/// Pulls postings as a JSON array from a configured feed URL.
pub struct HttpFeedProvider {
    client: Client,
    url: String,
}

impl HttpFeedProvider {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl JobFeedProvider for HttpFeedProvider {
    async fn fetch(&self, query: FeedQuery) -> Result<Vec<ExternalPosting>> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(location) = query.location.as_deref() {
            params.push(("location", location));
        }
        if let Some(keywords) = query.keywords.as_deref() {
            params.push(("keywords", keywords));
        }

        info!(url = %self.url, "Fetching external job feed");
        let postings = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ExternalPosting>>()
            .await?;
        Ok(postings)
    }
}

/// Non-cryptographic external id: millisecond timestamp plus a random fraction.
pub fn generate_external_id() -> String {
    format!(
        "{}_{}_{}",
        SOURCE_TAG,
        now().timestamp_millis(),
        rand::random::<f64>()
    )
}

fn partner_company(location: Option<&str>) -> CreateCompanyPayload {
    CreateCompanyPayload {
        name: PARTNER_COMPANY_NAME.to_string(),
        description: Some("A leading technology company sourced from Stepstone".to_string()),
        website: Some("https://stepstone.com".to_string()),
        logo: None,
        location: location.map(str::to_string),
    }
}

#[derive(Clone)]
pub struct SyncService {
    pool: PgPool,
    provider: Arc<dyn JobFeedProvider>,
}

impl SyncService {
    pub fn new(pool: PgPool, provider: Arc<dyn JobFeedProvider>) -> Self {
        Self { pool, provider }
    }

    /// Postings from the provider that pass the keyword filter.
    pub async fn collect_postings(&self, query: &FeedQuery) -> Result<Vec<ExternalPosting>> {
        let postings = self.provider.fetch(query.clone()).await?;
        let total = postings.len();
        let selected: Vec<ExternalPosting> = postings
            .into_iter()
            .filter(|posting| posting.matches_keywords(query.keywords.as_deref()))
            .collect();
        info!(total, selected = selected.len(), "Filtered external postings");
        Ok(selected)
    }

    /// Ingests matching postings as jobs under the partner company and records
    /// their provenance. Everything is written in one transaction.
    #[instrument(skip(self))]
    pub async fn sync(&self, query: FeedQuery) -> Result<Vec<Job>> {
        let postings = self.collect_postings(&query).await?;
        if postings.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let company = CompanyService::find_or_create_by_name(
            &mut tx,
            &partner_company(postings[0].location.as_deref()),
        )
        .await?;

        let insert_job = format!(
            r#"
            INSERT INTO jobs (
                title, description, company_id, location, type,
                salary_min, salary_max, skills, requirements
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let mut created = Vec::with_capacity(postings.len());
        for posting in postings {
            let job = sqlx::query_as::<_, Job>(&insert_job)
                .bind(&posting.title)
                .bind(&posting.description)
                .bind(company.id)
                .bind(&posting.location)
                .bind(&posting.job_type)
                .bind(posting.salary_min)
                .bind(posting.salary_max)
                .bind(Json(&posting.skills))
                .bind(&posting.requirements)
                .fetch_one(&mut *tx)
                .await?;

            let source = sqlx::query_as::<_, ExternalJobSource>(
                r#"
                INSERT INTO external_job_sources (source, external_id, job_id, data)
                VALUES ($1, $2, $3, $4)
                RETURNING id, source, external_id, job_id, last_synced, data
                "#,
            )
            .bind(SOURCE_TAG)
            .bind(generate_external_id())
            .bind(job.id)
            .bind(json!({ "originalData": posting }))
            .fetch_one(&mut *tx)
            .await?;
            tracing::debug!(job_id = job.id, external_id = %source.external_id, "Recorded job provenance");

            created.push(job);
        }

        tx.commit().await?;
        info!(created = created.len(), company_id = company.id, "External sync finished");
        Ok(created)
    }
}
