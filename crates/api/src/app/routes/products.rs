use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use advisorhub_core::ProductId;
use advisorhub_products::Product;

use crate::app::dto::ProductRequest;
use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::services::AppServices;
use crate::context::Authentication;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid product id".to_string()))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
    ValidatedJson(draft): ValidatedJson<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let principal = auth.require()?;
    let product = services.create_product(principal.principal(), draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
) -> Result<Json<Vec<Product>>, ApiError> {
    let principal = auth.require()?;
    Ok(Json(services.list_products(principal.principal()).await?))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let principal = auth.require()?;
    let id = parse_id(&id)?;
    Ok(Json(services.get_product(principal.principal(), id).await?))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
    Path(id): Path<String>,
    ValidatedJson(draft): ValidatedJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let principal = auth.require()?;
    let id = parse_id(&id)?;
    Ok(Json(services.update_product(principal.principal(), id, draft).await?))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let principal = auth.require()?;
    let id = parse_id(&id)?;
    services.delete_product(principal.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
