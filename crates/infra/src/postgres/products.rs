use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{instrument, Span};

use advisorhub_core::{AdvisorId, ProductId};
use advisorhub_products::{NewProduct, Price, Product, ProductDraft};

use super::map_sqlx_error;
use crate::repository::{ProductRepository, RepositoryError};

const COLUMNS: &str = "id, advisor_id, name, description, price, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self, new), fields(advisor_id = %new.advisor_id), err)]
    async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (id, advisor_id, name, description, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(ProductId::new().as_uuid())
        .bind(new.advisor_id.as_uuid())
        .bind(&new.draft.name)
        .bind(new.draft.description.as_deref())
        .bind(new.draft.price.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        decode(&row)
    }

    #[instrument(skip(self), fields(product_count = tracing::field::Empty), err)]
    async fn list_by_advisor(&self, advisor_id: AdvisorId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE advisor_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(advisor_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        Span::current().record("product_count", rows.len());
        rows.iter().map(decode).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self, draft), err)]
    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(draft.price.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        row.as_ref().map(decode).transpose()?.ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn decode(row: &sqlx::postgres::PgRow) -> Result<Product, RepositoryError> {
    ProductRow::from_row(row)
        .map_err(|e| RepositoryError::Decode(format!("product row: {e}")))?
        .try_into()
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: uuid::Uuid,
    advisor_id: uuid::Uuid,
    name: String,
    description: Option<String>,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            advisor_id: row.try_get("advisor_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| RepositoryError::Decode(e.to_string()))?;
        Ok(Product {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            price,
            advisor_id: AdvisorId::from_uuid(row.advisor_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
