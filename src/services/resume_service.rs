use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::dto::resume_dto::{CreateResumePayload, UpdateResumePayload, DEFAULT_TEMPLATE};
use crate::error::{Error, Result};
use crate::models::resume::{assign_entry_ids, Resume};

const RESUME_COLUMNS: &str = "id, user_id, title, personal_info, experience, education, skills, projects, certifications, template, is_default, created_at, updated_at";

#[derive(Clone)]
pub struct ResumeService {
    pool: PgPool,
}

impl ResumeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clears the default flag on every resume of `user_id` except `keep`.
    async fn clear_defaults(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        keep: Option<i32>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE resumes SET is_default = FALSE WHERE user_id = $1 AND is_default AND ($2::INT IS NULL OR id <> $2)",
        )
        .bind(user_id)
        .bind(keep)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn create(&self, user_id: &str, mut payload: CreateResumePayload) -> Result<Resume> {
        assign_entry_ids(&mut payload.experience);
        assign_entry_ids(&mut payload.education);
        assign_entry_ids(&mut payload.projects);
        assign_entry_ids(&mut payload.certifications);

        let mut tx = self.pool.begin().await?;
        if payload.is_default {
            Self::clear_defaults(&mut tx, user_id, None).await?;
        }

        let sql = format!(
            r#"
            INSERT INTO resumes (
                user_id, title, personal_info, experience, education,
                skills, projects, certifications, template, is_default
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            RESUME_COLUMNS
        );
        let resume = sqlx::query_as::<_, Resume>(&sql)
            .bind(user_id)
            .bind(&payload.title)
            .bind(payload.personal_info.as_ref().map(Json))
            .bind(Json(&payload.experience))
            .bind(Json(&payload.education))
            .bind(Json(&payload.skills))
            .bind(Json(&payload.projects))
            .bind(Json(&payload.certifications))
            .bind(payload.template.as_deref().unwrap_or(DEFAULT_TEMPLATE))
            .bind(payload.is_default)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(resume_id = resume.id, user_id, is_default = resume.is_default, "Resume created");
        Ok(resume)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Resume>> {
        let sql = format!(
            "SELECT {} FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC NULLS LAST, id DESC",
            RESUME_COLUMNS
        );
        let resumes = sqlx::query_as::<_, Resume>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(resumes)
    }

    pub async fn get(&self, id: i32, user_id: &str) -> Result<Resume> {
        let sql = format!(
            "SELECT {} FROM resumes WHERE id = $1 AND user_id = $2",
            RESUME_COLUMNS
        );
        sqlx::query_as::<_, Resume>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))
    }

    pub async fn update(&self, id: i32, user_id: &str, mut payload: UpdateResumePayload) -> Result<Resume> {
        for entries in payload.experience.iter_mut() {
            assign_entry_ids(entries);
        }
        for entries in payload.education.iter_mut() {
            assign_entry_ids(entries);
        }
        for entries in payload.projects.iter_mut() {
            assign_entry_ids(entries);
        }
        for entries in payload.certifications.iter_mut() {
            assign_entry_ids(entries);
        }

        let mut tx = self.pool.begin().await?;
        if payload.is_default == Some(true) {
            Self::clear_defaults(&mut tx, user_id, Some(id)).await?;
        }

        let sql = format!(
            r#"
            UPDATE resumes
            SET
                title = COALESCE($3, title),
                personal_info = COALESCE($4, personal_info),
                experience = COALESCE($5, experience),
                education = COALESCE($6, education),
                skills = COALESCE($7, skills),
                projects = COALESCE($8, projects),
                certifications = COALESCE($9, certifications),
                template = COALESCE($10, template),
                is_default = COALESCE($11, is_default),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            RESUME_COLUMNS
        );
        let resume = sqlx::query_as::<_, Resume>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&payload.title)
            .bind(payload.personal_info.as_ref().map(Json))
            .bind(payload.experience.as_ref().map(Json))
            .bind(payload.education.as_ref().map(Json))
            .bind(payload.skills.as_ref().map(Json))
            .bind(payload.projects.as_ref().map(Json))
            .bind(payload.certifications.as_ref().map(Json))
            .bind(&payload.template)
            .bind(payload.is_default)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;
        tx.commit().await?;

        Ok(resume)
    }

    pub async fn delete(&self, id: i32, user_id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Resume not found".to_string()));
        }
        Ok(())
    }

    /// Makes `id` the caller's only default resume in one transaction.
    pub async fn set_default(&self, id: i32, user_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::clear_defaults(&mut tx, user_id, Some(id)).await?;

        let res = sqlx::query(
            "UPDATE resumes SET is_default = TRUE, updated_at = NOW() WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Resume not found".to_string()));
        }

        tx.commit().await?;
        tracing::info!(resume_id = id, user_id, "Default resume updated");
        Ok(())
    }
}
