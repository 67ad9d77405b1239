//! Application services: the use cases behind each route.
//!
//! Handlers stay thin; everything that touches storage, hashing, or tokens
//! happens here, and each successful operation is logged once.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use advisorhub_advisors::{AdvisorProfile, LoginAdvisor, RegisterAdvisor};
use advisorhub_auth::{
    authorize_owner, hash_password, verify_password_against, Hs256Jwt, JwtValidator, Principal,
    TokenIssuer,
};
use advisorhub_core::ProductId;
use advisorhub_infra::{
    postgres, AdvisorRepository, InMemoryAdvisorRepository, InMemoryProductRepository,
    PostgresAdvisorRepository, PostgresProductRepository, ProductRepository, RepositoryError,
};
use advisorhub_products::{Product, ProductDraft};

use crate::app::dto::{LoginResponse, RegisterResponse};
use crate::app::errors::ApiError;

pub const DUPLICATE_EMAIL: &str = "Unable to register. Email may already exist.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// What the caller is trying to do with a product; used in the 403 message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProductAction {
    Get,
    Update,
    Delete,
}

impl ProductAction {
    fn verb(self) -> &'static str {
        match self {
            ProductAction::Get => "get",
            ProductAction::Update => "update",
            ProductAction::Delete => "delete",
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    advisors: Arc<dyn AdvisorRepository>,
    products: Arc<dyn ProductRepository>,
    jwt: Arc<Hs256Jwt>,
}

impl AppServices {
    pub fn new(
        advisors: Arc<dyn AdvisorRepository>,
        products: Arc<dyn ProductRepository>,
        jwt: Hs256Jwt,
    ) -> Self {
        Self {
            advisors,
            products,
            jwt: Arc::new(jwt),
        }
    }

    /// Services over process-local stores (development and tests).
    pub fn in_memory(jwt: Hs256Jwt) -> Self {
        Self::new(
            Arc::new(InMemoryAdvisorRepository::new()),
            Arc::new(InMemoryProductRepository::new()),
            jwt,
        )
    }

    /// Services over PostgreSQL; creates the schema if it is missing.
    pub async fn postgres(pool: PgPool, jwt: Hs256Jwt) -> Result<Self, RepositoryError> {
        postgres::ensure_schema(&pool).await?;
        Ok(Self::new(
            Arc::new(PostgresAdvisorRepository::new(pool.clone())),
            Arc::new(PostgresProductRepository::new(pool)),
            jwt,
        ))
    }

    pub fn jwt_validator(&self) -> Arc<dyn JwtValidator> {
        self.jwt.clone()
    }

    // -------------------------
    // Advisors
    // -------------------------

    pub async fn register(&self, cmd: RegisterAdvisor) -> Result<RegisterResponse, ApiError> {
        let password = cmd.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(password.expose())).await??;

        let advisor = match self.advisors.create(cmd.with_hash(password_hash)).await {
            Ok(advisor) => advisor,
            Err(RepositoryError::UniqueViolation(constraint)) => {
                tracing::debug!(%constraint, "registration rejected");
                return Err(ApiError::BadRequest(DUPLICATE_EMAIL.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let token = self.jwt.issue(advisor.id, Utc::now())?;
        tracing::info!(advisor_id = %advisor.id, "Advisor created successfully");

        Ok(RegisterResponse {
            name: advisor.name,
            email: advisor.email.to_string(),
            token,
        })
    }

    pub async fn login(&self, cmd: LoginAdvisor) -> Result<LoginResponse, ApiError> {
        let invalid = || ApiError::InvalidCredentials(INVALID_CREDENTIALS.to_string());

        let advisor = self.advisors.find_by_email(&cmd.email).await?;

        // Unknown emails still pay for an Argon2 run.
        let password = cmd.password;
        let stored_hash = advisor.as_ref().map(|a| a.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || {
            verify_password_against(password.expose(), stored_hash.as_deref())
        })
        .await??;
        let advisor = match advisor {
            Some(advisor) if matches => advisor,
            _ => return Err(invalid()),
        };

        let token = self.jwt.issue(advisor.id, Utc::now())?;
        tracing::info!(advisor_id = %advisor.id, "Advisor logged in successfully");

        Ok(LoginResponse { token })
    }

    pub async fn profile(&self, principal: &Principal) -> Result<AdvisorProfile, ApiError> {
        let advisor = self
            .advisors
            .find_by_id(principal.advisor_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Advisor not found".to_string()))?;
        Ok(advisor.profile())
    }

    // -------------------------
    // Products
    // -------------------------

    pub async fn create_product(
        &self,
        principal: &Principal,
        draft: ProductDraft,
    ) -> Result<Product, ApiError> {
        let product = self
            .products
            .create(draft.owned_by(principal.advisor_id))
            .await?;
        tracing::info!(
            product_id = %product.id,
            advisor_id = %product.advisor_id,
            "Product created successfully"
        );
        Ok(product)
    }

    pub async fn list_products(&self, principal: &Principal) -> Result<Vec<Product>, ApiError> {
        let products = self.products.list_by_advisor(principal.advisor_id).await?;
        tracing::info!(
            product_count = products.len(),
            advisor_id = %principal.advisor_id,
            "Total products fetched"
        );
        Ok(products)
    }

    pub async fn get_product(&self, principal: &Principal, id: ProductId) -> Result<Product, ApiError> {
        let product = self.owned_product(principal, id, ProductAction::Get).await?;
        tracing::info!(
            product_id = %product.id,
            advisor_id = %principal.advisor_id,
            "Product retrieved successfully"
        );
        Ok(product)
    }

    pub async fn update_product(
        &self,
        principal: &Principal,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ApiError> {
        self.owned_product(principal, id, ProductAction::Update).await?;
        let product = self.products.update(id, draft).await.map_err(product_gone)?;
        tracing::info!(
            product_id = %product.id,
            advisor_id = %principal.advisor_id,
            "Product updated successfully"
        );
        Ok(product)
    }

    pub async fn delete_product(&self, principal: &Principal, id: ProductId) -> Result<(), ApiError> {
        self.owned_product(principal, id, ProductAction::Delete).await?;
        self.products.delete(id).await.map_err(product_gone)?;
        tracing::info!(
            product_id = %id,
            advisor_id = %principal.advisor_id,
            "Product deleted successfully"
        );
        Ok(())
    }

    /// Load a product and require that `principal` owns it.
    ///
    /// A missing product is 404 regardless of who asks.
    async fn owned_product(
        &self,
        principal: &Principal,
        id: ProductId,
        action: ProductAction,
    ) -> Result<Product, ApiError> {
        let Some(product) = self.products.find_by_id(id).await? else {
            tracing::info!(
                advisor_id = %principal.advisor_id,
                product_id = %id,
                action = action.verb(),
                "product not found"
            );
            return Err(ApiError::NotFound(PRODUCT_NOT_FOUND.to_string()));
        };

        authorize_owner(principal, &product).map_err(|_| {
            tracing::warn!(
                advisor_id = %principal.advisor_id,
                product_id = %id,
                owner_id = %product.advisor_id,
                action = action.verb(),
                "product access denied"
            );
            ApiError::Forbidden(format!("Not authorized to {} this product", action.verb()))
        })?;

        Ok(product)
    }
}

fn product_gone(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound(PRODUCT_NOT_FOUND.to_string()),
        other => other.into(),
    }
}
