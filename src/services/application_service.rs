use std::collections::HashMap;

use sqlx::PgPool;

use crate::dto::application_dto::CreateApplicationPayload;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationWithJob};
use crate::services::job_service::JobService;

const APPLICATION_COLUMNS: &str =
    "id, user_id, job_id, status, cover_letter, resume, applied_at, updated_at";

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    jobs: JobService,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        let jobs = JobService::new(pool.clone());
        Self { pool, jobs }
    }

    /// Inserts the application unless one already exists for (user, job).
    /// The unique constraint decides, so concurrent duplicates are rejected too.
    pub async fn create(&self, user_id: &str, payload: CreateApplicationPayload) -> Result<Application> {
        self.jobs.get_by_id(payload.job_id).await?;

        let sql = format!(
            r#"
            INSERT INTO applications (user_id, job_id, cover_letter, resume)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Application>(&sql)
            .bind(user_id)
            .bind(payload.job_id)
            .bind(&payload.cover_letter)
            .bind(&payload.resume)
            .fetch_optional(&self.pool)
            .await?;

        match inserted {
            Some(application) => {
                tracing::info!(
                    application_id = application.id,
                    job_id = application.job_id,
                    user_id,
                    "Application submitted"
                );
                Ok(application)
            }
            None => Err(Error::Conflict(
                "You have already applied to this job".to_string(),
            )),
        }
    }

    /// The caller's applications, newest first, each with its job and company.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ApplicationWithJob>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE user_id = $1 ORDER BY applied_at DESC NULLS LAST, id DESC",
            APPLICATION_COLUMNS
        );
        let applications = sqlx::query_as::<_, Application>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let job_ids: Vec<i32> = applications.iter().map(|a| a.job_id).collect();
        let mut jobs: HashMap<i32, _> = self
            .jobs
            .list_by_ids(&job_ids)
            .await?
            .into_iter()
            .map(|job| (job.job.id, job))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let job = jobs.remove(&application.job_id);
                ApplicationWithJob { application, job }
            })
            .collect())
    }

    /// Status-only update. The status is validated by the caller.
    pub async fn update_status(&self, id: i32, user_id: &str, status: &str) -> Result<Application> {
        let sql = format!(
            r#"
            UPDATE applications
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        tracing::info!(application_id = id, status, "Application status updated");
        Ok(application)
    }
}
