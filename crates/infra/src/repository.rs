//! Storage-agnostic repository contracts.

use async_trait::async_trait;
use thiserror::Error;

use advisorhub_advisors::{Advisor, Email, NewAdvisor};
use advisorhub_core::{AdvisorId, ProductId};
use advisorhub_products::{NewProduct, Product, ProductDraft};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A unique constraint rejected the write (e.g. advisor email).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The row to modify does not exist.
    #[error("record not found")]
    NotFound,

    /// A stored row could not be mapped back into a domain value.
    #[error("failed to decode row: {0}")]
    Decode(String),

    /// Any other storage failure (connectivity, pool, SQL).
    #[error("database error: {0}")]
    Database(String),
}

/// Advisor persistence.
///
/// Email uniqueness is enforced here, by the store, not by callers.
#[async_trait]
pub trait AdvisorRepository: Send + Sync {
    async fn create(&self, new: NewAdvisor) -> Result<Advisor, RepositoryError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Advisor>, RepositoryError>;
    async fn find_by_id(&self, id: AdvisorId) -> Result<Option<Advisor>, RepositoryError>;
}

/// Product persistence. Ownership checks belong to callers; the store only
/// scopes listings by owner.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError>;

    /// Products owned by `advisor_id`, oldest first.
    async fn list_by_advisor(&self, advisor_id: AdvisorId) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Replace editable fields; `NotFound` if the product is gone.
    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, RepositoryError>;

    /// Remove a product; `NotFound` if it was already gone.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;
}
