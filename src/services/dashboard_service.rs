use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::dto::dashboard_dto::{ActivityItem, ActivityKind, DashboardStats};
use crate::error::Result;
use crate::models::application::{INTERVIEW_STATUS, PENDING_STATUSES};
use crate::utils::time::millis_or_epoch;

pub const ACTIVITY_FEED_LIMIT: usize = 10;

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: i32,
    job_title: Option<String>,
    company_name: Option<String>,
    status: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl ActivityRow {
    fn into_item(self, kind: ActivityKind) -> ActivityItem {
        ActivityItem {
            kind,
            id: self.id,
            job_title: self.job_title,
            company_name: self.company_name,
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

/// Merges two activity streams into one feed, newest first, at most `limit` long.
/// Missing timestamps sort as the epoch. Ties keep applications ahead of saves.
pub fn merge_activity(
    applications: Vec<ActivityItem>,
    saves: Vec<ActivityItem>,
    limit: usize,
) -> Vec<ActivityItem> {
    let mut all: Vec<ActivityItem> = applications.into_iter().chain(saves).collect();
    all.sort_by_key(|item| std::cmp::Reverse(millis_or_epoch(item.timestamp)));
    all.truncate(limit);
    all
}

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, user_id: &str, statuses: &[&str]) -> Result<i64> {
        let mut statement = sqlx::query_scalar::<_, i64>(sql).bind(user_id.to_string());
        if !statuses.is_empty() {
            let owned: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
            statement = statement.bind(owned);
        }
        Ok(statement.fetch_one(&self.pool).await?)
    }

    pub async fn stats(&self, user_id: &str) -> Result<DashboardStats> {
        let applications = self
            .count("SELECT COUNT(*) FROM applications WHERE user_id = $1", user_id, &[])
            .await?;
        let saved_jobs = self
            .count("SELECT COUNT(*) FROM saved_jobs WHERE user_id = $1", user_id, &[])
            .await?;
        let pending = self
            .count(
                "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND status = ANY($2)",
                user_id,
                &PENDING_STATUSES,
            )
            .await?;
        let interviews = self
            .count(
                "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND status = ANY($2)",
                user_id,
                &[INTERVIEW_STATUS],
            )
            .await?;

        Ok(DashboardStats {
            applications,
            saved_jobs,
            pending,
            interviews,
        })
    }

    /// Latest applications and saves. Each source is read with the full feed
    /// limit so the merged feed is the true global top entries.
    pub async fn recent_activity(&self, user_id: &str) -> Result<Vec<ActivityItem>> {
        let limit = ACTIVITY_FEED_LIMIT as i64;

        let applications = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT a.id, j.title AS job_title, c.name AS company_name, a.status, a.applied_at AS timestamp
            FROM applications a
            LEFT JOIN jobs j ON j.id = a.job_id
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE a.user_id = $1
            ORDER BY a.applied_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let saves = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT s.id, j.title AS job_title, c.name AS company_name, NULL::VARCHAR AS status, s.saved_at AS timestamp
            FROM saved_jobs s
            LEFT JOIN jobs j ON j.id = s.job_id
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(merge_activity(
            applications
                .into_iter()
                .map(|row| row.into_item(ActivityKind::Application))
                .collect(),
            saves
                .into_iter()
                .map(|row| row.into_item(ActivityKind::Save))
                .collect(),
            ACTIVITY_FEED_LIMIT,
        ))
    }
}
