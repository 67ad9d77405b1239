//! In-memory repositories for tests/dev.
//!
//! Same semantics as the PostgreSQL adapters, including email uniqueness.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use advisorhub_advisors::{Advisor, Email, NewAdvisor};
use advisorhub_core::{AdvisorId, Entity, ProductId};
use advisorhub_products::{NewProduct, Product, ProductDraft};

use crate::repository::{AdvisorRepository, ProductRepository, RepositoryError};

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Database("in-memory store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct InMemoryAdvisorRepository {
    inner: RwLock<HashMap<AdvisorId, Advisor>>,
}

impl InMemoryAdvisorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdvisorRepository for InMemoryAdvisorRepository {
    async fn create(&self, new: NewAdvisor) -> Result<Advisor, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.values().any(|a| a.email == new.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "advisors.email = {}",
                new.email
            )));
        }

        let now = Utc::now();
        let advisor = Advisor {
            id: AdvisorId::new(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        map.insert(*advisor.id(), advisor.clone());
        Ok(advisor)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Advisor>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AdvisorId) -> Result<Option<Advisor>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let product = Product::create(new, Utc::now());
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(*product.id(), product.clone());
        Ok(product)
    }

    async fn list_by_advisor(&self, advisor_id: AdvisorId) -> Result<Vec<Product>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut items: Vec<Product> = map
            .values()
            .filter(|p| p.advisor_id == advisor_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let product = map.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        product.revise(draft, Utc::now());
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
