use sqlx::PgPool;

use crate::dto::job_alert_dto::CreateJobAlertPayload;
use crate::error::{Error, Result};
use crate::models::job_alert::JobAlert;

const JOB_ALERT_COLUMNS: &str =
    "id, user_id, keywords, location, type, salary_min, is_active, created_at";

#[derive(Clone)]
pub struct JobAlertService {
    pool: PgPool,
}

impl JobAlertService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, payload: CreateJobAlertPayload) -> Result<JobAlert> {
        let sql = format!(
            r#"
            INSERT INTO job_alerts (user_id, keywords, location, type, salary_min, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            JOB_ALERT_COLUMNS
        );
        let alert = sqlx::query_as::<_, JobAlert>(&sql)
            .bind(user_id)
            .bind(&payload.keywords)
            .bind(&payload.location)
            .bind(&payload.job_type)
            .bind(payload.salary_min)
            .bind(payload.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await?;
        Ok(alert)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobAlert>> {
        let sql = format!(
            "SELECT {} FROM job_alerts WHERE user_id = $1 ORDER BY created_at DESC NULLS LAST, id DESC",
            JOB_ALERT_COLUMNS
        );
        let alerts = sqlx::query_as::<_, JobAlert>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    pub async fn delete(&self, id: i32, user_id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM job_alerts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job alert not found".to_string()));
        }
        Ok(())
    }
}
