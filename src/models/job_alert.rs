use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored search a user wants to be notified about. Delivery is not implemented.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobAlert {
    pub id: i32,
    pub user_id: String,
    pub keywords: Option<String>,
    pub location: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}
