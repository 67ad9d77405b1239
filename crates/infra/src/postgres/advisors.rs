use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use advisorhub_advisors::{Advisor, Email, NewAdvisor};
use advisorhub_core::AdvisorId;

use super::map_sqlx_error;
use crate::repository::{AdvisorRepository, RepositoryError};

const COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresAdvisorRepository {
    pool: PgPool,
}

impl PostgresAdvisorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdvisorRepository for PostgresAdvisorRepository {
    #[instrument(skip(self, new), fields(email = %new.email), err)]
    async fn create(&self, new: NewAdvisor) -> Result<Advisor, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO advisors (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(AdvisorId::new().as_uuid())
        .bind(new.email.as_str())
        .bind(&new.name)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_advisor", e))?;

        decode(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Advisor>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM advisors WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_advisor_by_email", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: AdvisorId) -> Result<Option<Advisor>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM advisors WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_advisor_by_id", e))?;

        row.as_ref().map(decode).transpose()
    }
}

fn decode(row: &sqlx::postgres::PgRow) -> Result<Advisor, RepositoryError> {
    AdvisorRow::from_row(row)
        .map(Into::into)
        .map_err(|e| RepositoryError::Decode(format!("advisor row: {e}")))
}

// SQLx row types

#[derive(Debug)]
struct AdvisorRow {
    id: uuid::Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for AdvisorRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(AdvisorRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<AdvisorRow> for Advisor {
    fn from(row: AdvisorRow) -> Self {
        Advisor {
            id: AdvisorId::from_uuid(row.id),
            email: Email::from_stored(row.email),
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
