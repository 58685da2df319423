use sqlx::{PgPool, Postgres, Transaction};

use crate::dto::company_dto::CreateCompanyPayload;
use crate::error::Result;
use crate::models::company::Company;

pub(crate) const COMPANY_COLUMNS: &str =
    "id, name, description, website, logo, location, created_at";

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCompanyPayload) -> Result<Company> {
        let sql = format!(
            r#"
            INSERT INTO companies (name, description, website, logo, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.website)
            .bind(&payload.logo)
            .bind(&payload.location)
            .fetch_one(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        let sql = format!("SELECT {} FROM companies ORDER BY name, id", COMPANY_COLUMNS);
        let companies = sqlx::query_as::<_, Company>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    /// Looks a company up by exact name inside `tx`, inserting it from `template` when absent.
    pub async fn find_or_create_by_name(
        tx: &mut Transaction<'_, Postgres>,
        template: &CreateCompanyPayload,
    ) -> Result<Company> {
        let select = format!(
            "SELECT {} FROM companies WHERE name = $1 ORDER BY id LIMIT 1",
            COMPANY_COLUMNS
        );
        if let Some(existing) = sqlx::query_as::<_, Company>(&select)
            .bind(&template.name)
            .fetch_optional(&mut **tx)
            .await?
        {
            return Ok(existing);
        }

        let insert = format!(
            r#"
            INSERT INTO companies (name, description, website, logo, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&insert)
            .bind(&template.name)
            .bind(&template.description)
            .bind(&template.website)
            .bind(&template.logo)
            .bind(&template.location)
            .fetch_one(&mut **tx)
            .await?;

        tracing::info!(company_id = company.id, name = %company.name, "Created company");
        Ok(company)
    }
}
