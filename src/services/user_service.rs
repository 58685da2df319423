use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::User;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, profile_image_url, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the user described by verified token claims, or refreshes the
    /// profile fields of an existing one.
    pub async fn upsert(&self, claims: &Claims) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&claims.sub)
            .bind(&claims.email)
            .bind(&claims.first_name)
            .bind(&claims.last_name)
            .bind(&claims.profile_image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
