use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::job::{JobCompanyRow, JobWithCompany, JOB_WITH_COMPANY_COLUMNS};
use crate::models::saved_job::SavedJob;
use crate::services::job_service::JobService;

#[derive(Clone)]
pub struct SavedJobService {
    pool: PgPool,
    jobs: JobService,
}

impl SavedJobService {
    pub fn new(pool: PgPool) -> Self {
        let jobs = JobService::new(pool.clone());
        Self { pool, jobs }
    }

    pub async fn save(&self, user_id: &str, job_id: i32) -> Result<SavedJob> {
        self.jobs.get_by_id(job_id).await?;

        let saved = sqlx::query_as::<_, SavedJob>(
            r#"
            INSERT INTO saved_jobs (user_id, job_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING id, user_id, job_id, saved_at
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        saved.ok_or_else(|| Error::Conflict("Job is already saved".to_string()))
    }

    pub async fn unsave(&self, user_id: &str, job_id: i32) -> Result<()> {
        let res = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(user_id, job_id, removed = res.rows_affected(), "Job unsaved");
        Ok(())
    }

    /// Saved jobs as job listings, most recently saved first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobWithCompany>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM saved_jobs s
            JOIN jobs j ON j.id = s.job_id
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC NULLS LAST, s.id DESC
            "#,
            JOB_WITH_COMPANY_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobCompanyRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut job = JobWithCompany::from(row);
                job.is_saved = Some(true);
                job
            })
            .collect())
    }
}
